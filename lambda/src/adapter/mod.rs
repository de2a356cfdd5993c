//! Lambda invocation to listener adaptation

pub mod invocation;

pub use invocation::{
    Completion, InvocationEvent, InvocationResult, Listener, ListenerRequest, ResponseShim, adapt,
};
