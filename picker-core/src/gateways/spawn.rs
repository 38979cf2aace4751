use futures::{
    executor::LocalSpawner,
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};

/// Runs detached tasks on the current thread.
pub trait TaskSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(err) = self.spawn_local(task) {
            log::error!("Unable to spawn task: {err}");
        }
    }
}
