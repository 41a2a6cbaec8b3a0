/// Half the width of a map along x and y, in world units
pub const MAP_HALF_SIZE: f32 = 17066.666;
/// Width of one grid cell; also the farthest a transport report may jump from the stored position
pub const SIZE_OF_GRIDS: f32 = 533.3333;

/// Transport-relative offsets farther than this on any axis are discarded
pub const TRANSPORT_OFFSET_LIMIT: f32 = 75.0;
/// Absolute tolerance used when comparing acknowledged values with the ones sent
pub const ACK_TOLERANCE: f32 = 0.01;
/// Pets farther than (visibility range - margin) are pulled along after a teleport
pub const PET_TELEPORT_MARGIN: f32 = 5.0;
