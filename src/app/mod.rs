// Application layer - Use case interactors

pub mod container;
pub mod cut_interactor;
pub mod fetch_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use cut_interactor::{CutInteractor, CutRequest};
pub use fetch_interactor::{FetchInteractor, FetchRequest};
