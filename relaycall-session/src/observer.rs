use async_trait::async_trait;

/// Lifecycle sink implemented by the host application. Injected once at
/// session construction, never reassigned. Only Responder-role sessions
/// invoke it.
#[async_trait]
pub trait LifecycleObserver: Send + Sync {
    async fn on_call_started(&self);
    async fn on_call_ended(&self);
    async fn on_call_failed(&self);
}
