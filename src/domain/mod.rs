// Domain layer - Frame geometry and the rules applied to a cut

pub mod errors;
pub mod model;
pub mod rules;
