mod batch_dispatcher;

pub use batch_dispatcher::BatchDispatcher;
