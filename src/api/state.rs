// src/api/state.rs
use std::sync::Arc;

use crate::providers::StudioProvider;
use crate::runner::GymRunner;

pub struct AppState<P> {
    pub gym: Arc<GymRunner<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self { gym: Arc::clone(&self.gym) }
    }
}

impl<P: StudioProvider + 'static> AppState<P> {
    pub fn new(provider: P) -> Self {
        Self {
            gym: Arc::new(GymRunner::new(provider)),
        }
    }
}
