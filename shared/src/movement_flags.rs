use bitflags::bitflags;

bitflags! {
    /// Bit set describing what a movable entity is currently doing, as
    /// reported by its driving client and merged by the server
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MovementFlags: u32 {
        const FORWARD          = 0x0000_0001;
        const BACKWARD         = 0x0000_0002;
        const STRAFE_LEFT      = 0x0000_0004;
        const STRAFE_RIGHT     = 0x0000_0008;
        const TURN_LEFT        = 0x0000_0010;
        const TURN_RIGHT       = 0x0000_0020;
        const PITCH_UP         = 0x0000_0040;
        const PITCH_DOWN       = 0x0000_0080;
        const WALK_MODE        = 0x0000_0100;
        const ON_TRANSPORT     = 0x0000_0200;
        const LEVITATING       = 0x0000_0400;
        const ROOT             = 0x0000_0800;
        const FALLING          = 0x0000_2000;
        const FALLING_FAR      = 0x0000_4000;
        const SWIMMING         = 0x0020_0000;
        const ASCENDING        = 0x0040_0000;
        const CAN_FLY          = 0x0080_0000;
        const PLAYER_FLYING    = 0x0100_0000;
        const SPLINE_ELEVATION = 0x0400_0000;
        const SPLINE_ENABLED   = 0x0800_0000;
        const WATER_WALKING    = 0x1000_0000;
        const FALLING_SLOW     = 0x2000_0000;
        const HOVER            = 0x4000_0000;

        /// Every flag implying the entity is translating
        const MASK_MOVING = Self::FORWARD.bits()
            | Self::BACKWARD.bits()
            | Self::STRAFE_LEFT.bits()
            | Self::STRAFE_RIGHT.bits()
            | Self::PITCH_UP.bits()
            | Self::PITCH_DOWN.bits()
            | Self::FALLING.bits()
            | Self::FALLING_FAR.bits()
            | Self::ASCENDING.bits()
            | Self::SPLINE_ELEVATION.bits();
        const MASK_TURNING = Self::TURN_LEFT.bits() | Self::TURN_RIGHT.bits();
    }
}
