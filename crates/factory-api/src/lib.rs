//! Runtime facade for the agent factory: lifecycle timers, the memory
//! bridge, snapshot broadcast, and the HTTP/WS observer server.

mod memory;
mod runtime;
mod server;

pub use memory::{
    HttpMemoryService, MemoryBridge, MemoryService, MemoryServiceError, NullMemoryService,
};
pub use runtime::FactoryRuntime;
pub use server::{serve, ServerError};
