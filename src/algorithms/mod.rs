pub mod counterfactual;
pub mod normalize;
pub mod ranking;

pub use counterfactual::CounterfactualSearch;
pub use normalize::{normalize_contributions, normalize_single};
pub use ranking::{mean_absolute, rank_contributions, rank_importances};
