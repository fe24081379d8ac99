pub(crate) mod dispatcher;
pub(crate) mod realtime_event;

// Re-export the public interface
pub use dispatcher::RealtimeDispatcher;
pub use realtime_event::RealtimeEvent;
