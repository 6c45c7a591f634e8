use tokio::task::{self, JoinError};



/// Runs a blocking closure on the runtime's blocking pool, so that SQLite work never stalls the task that awaits it.
///
/// Works on both the multi-threaded runtime and the single-threaded one actix uses.
pub async fn block_on<F, R>( func: F ) -> Result<R, JoinError> where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static
{
	task::spawn_blocking( func ).await
}
