use crate::MovementFlags;

pub const MOVE_TYPE_COUNT: usize = 8;

/// Movement category whose speed the server may force on a client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveType {
    Walk,
    Run,
    RunBack,
    Swim,
    SwimBack,
    TurnRate,
    Flight,
    FlightBack,
}

impl MoveType {
    pub const ALL: [MoveType; MOVE_TYPE_COUNT] = [
        MoveType::Walk,
        MoveType::Run,
        MoveType::RunBack,
        MoveType::Swim,
        MoveType::SwimBack,
        MoveType::TurnRate,
        MoveType::Flight,
        MoveType::FlightBack,
    ];

    /// Speed at a rate of 1.0 (units per second, radians per second for turn rate)
    pub fn base_speed(&self) -> f32 {
        match self {
            MoveType::Walk => 2.5,
            MoveType::Run => 7.0,
            MoveType::RunBack => 4.5,
            MoveType::Swim => 4.722222,
            MoveType::SwimBack => 2.5,
            MoveType::TurnRate => 3.141594,
            MoveType::Flight => 7.0,
            MoveType::FlightBack => 4.5,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MoveType::Walk => 0,
            MoveType::Run => 1,
            MoveType::RunBack => 2,
            MoveType::Swim => 3,
            MoveType::SwimBack => 4,
            MoveType::TurnRate => 5,
            MoveType::Flight => 6,
            MoveType::FlightBack => 7,
        }
    }
}

/// Server-granted movement capability that the client must ratify
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagToggle {
    Root,
    WaterWalk,
    Hover,
    FeatherFall,
    CanFly,
}

impl FlagToggle {
    /// The movement flag observers see toggled once the change resolves
    pub fn movement_flag(&self) -> MovementFlags {
        match self {
            FlagToggle::Root => MovementFlags::ROOT,
            FlagToggle::WaterWalk => MovementFlags::WATER_WALKING,
            FlagToggle::Hover => MovementFlags::HOVER,
            FlagToggle::FeatherFall => MovementFlags::FALLING_SLOW,
            FlagToggle::CanFly => MovementFlags::CAN_FLY,
        }
    }
}
