/// Category of a movement report. Every category shares one validation path;
/// the category is preserved so observers can tell a jump from a heartbeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementOpcode {
    StartForward,
    StartBackward,
    Stop,
    StartStrafeLeft,
    StartStrafeRight,
    StopStrafe,
    Jump,
    StartTurnLeft,
    StartTurnRight,
    StopTurn,
    StartPitchUp,
    StartPitchDown,
    StopPitch,
    SetRunMode,
    SetWalkMode,
    FallLand,
    StartSwim,
    StopSwim,
    SetFacing,
    SetPitch,
    Heartbeat,
    StartAscend,
    StopAscend,
    StartDescend,
    FallReset,
    SetFly,
    ChangeTransport,
    StartSwimCheat,
    StopSwimCheat,
}

impl MovementOpcode {
    pub fn name(&self) -> &'static str {
        match self {
            MovementOpcode::StartForward => "MSG_MOVE_START_FORWARD",
            MovementOpcode::StartBackward => "MSG_MOVE_START_BACKWARD",
            MovementOpcode::Stop => "MSG_MOVE_STOP",
            MovementOpcode::StartStrafeLeft => "MSG_MOVE_START_STRAFE_LEFT",
            MovementOpcode::StartStrafeRight => "MSG_MOVE_START_STRAFE_RIGHT",
            MovementOpcode::StopStrafe => "MSG_MOVE_STOP_STRAFE",
            MovementOpcode::Jump => "MSG_MOVE_JUMP",
            MovementOpcode::StartTurnLeft => "MSG_MOVE_START_TURN_LEFT",
            MovementOpcode::StartTurnRight => "MSG_MOVE_START_TURN_RIGHT",
            MovementOpcode::StopTurn => "MSG_MOVE_STOP_TURN",
            MovementOpcode::StartPitchUp => "MSG_MOVE_START_PITCH_UP",
            MovementOpcode::StartPitchDown => "MSG_MOVE_START_PITCH_DOWN",
            MovementOpcode::StopPitch => "MSG_MOVE_STOP_PITCH",
            MovementOpcode::SetRunMode => "MSG_MOVE_SET_RUN_MODE",
            MovementOpcode::SetWalkMode => "MSG_MOVE_SET_WALK_MODE",
            MovementOpcode::FallLand => "MSG_MOVE_FALL_LAND",
            MovementOpcode::StartSwim => "MSG_MOVE_START_SWIM",
            MovementOpcode::StopSwim => "MSG_MOVE_STOP_SWIM",
            MovementOpcode::SetFacing => "MSG_MOVE_SET_FACING",
            MovementOpcode::SetPitch => "MSG_MOVE_SET_PITCH",
            MovementOpcode::Heartbeat => "MSG_MOVE_HEARTBEAT",
            MovementOpcode::StartAscend => "MSG_MOVE_START_ASCEND",
            MovementOpcode::StopAscend => "MSG_MOVE_STOP_ASCEND",
            MovementOpcode::StartDescend => "MSG_MOVE_START_DESCEND",
            MovementOpcode::FallReset => "CMSG_MOVE_FALL_RESET",
            MovementOpcode::SetFly => "CMSG_MOVE_SET_FLY",
            MovementOpcode::ChangeTransport => "CMSG_MOVE_CHNG_TRANSPORT",
            MovementOpcode::StartSwimCheat => "MSG_MOVE_START_SWIM_CHEAT",
            MovementOpcode::StopSwimCheat => "MSG_MOVE_STOP_SWIM_CHEAT",
        }
    }
}
