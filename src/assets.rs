pub mod locate;
pub mod normalize;
pub mod palette;
