pub mod fields;
pub mod recommendations;
pub mod title;

pub use fields::extract_field;
pub use recommendations::{parse_recommendations, ParseRules, RecommendationParser};
pub use title::{alphanumeric_only, normalize, simplify};
