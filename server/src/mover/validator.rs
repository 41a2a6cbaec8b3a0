use log::{debug, trace};

use helm_shared::{FlagToggle, MovementFlags, MovementInfo};

use crate::{DropReason, MovableEntity, MovementWorld, ServerConfig};

const OPPOSING_PAIRS: [(MovementFlags, MovementFlags); 4] = [
    (MovementFlags::FORWARD, MovementFlags::BACKWARD),
    (MovementFlags::STRAFE_LEFT, MovementFlags::STRAFE_RIGHT),
    (MovementFlags::TURN_LEFT, MovementFlags::TURN_RIGHT),
    (MovementFlags::PITCH_UP, MovementFlags::PITCH_DOWN),
];

/// Strips flags the entity is not entitled to and flag combinations no
/// client can produce
pub(crate) fn sanitize(mover: &MovableEntity, info: &mut MovementInfo) {
    let flags = &mut info.flags;

    for toggle in [
        FlagToggle::WaterWalk,
        FlagToggle::FeatherFall,
        FlagToggle::Hover,
    ] {
        if !mover.has_capability(toggle) {
            flags.remove(toggle.movement_flag());
        }
    }
    if !mover.has_capability(FlagToggle::CanFly) {
        flags.remove(MovementFlags::CAN_FLY | MovementFlags::PLAYER_FLYING);
    }

    if mover.has_capability(FlagToggle::Root) {
        flags.remove(MovementFlags::MASK_MOVING);
        flags.insert(MovementFlags::ROOT);
    } else {
        flags.remove(MovementFlags::ROOT);
    }

    for (a, b) in OPPOSING_PAIRS {
        if flags.contains(a) && flags.contains(b) {
            flags.remove(a | b);
        }
    }

    // splines are only ever started by the server
    flags.remove(MovementFlags::SPLINE_ENABLED);

    if info.transport.is_none() {
        info.flags.remove(MovementFlags::ON_TRANSPORT);
    } else if !info.flags.contains(MovementFlags::ON_TRANSPORT) {
        info.transport = None;
    }
}

/// Runs a movement report through every validation step, in order, and merges
/// it into the entity's canonical snapshot when it survives. On error nothing
/// observable has changed except transport membership.
pub(crate) fn accept_report<W: MovementWorld>(
    world: &mut W,
    config: &ServerConfig,
    mover: &mut MovableEntity,
    info: &mut MovementInfo,
) -> Result<(), DropReason> {
    let entity = mover.id();

    // near teleports keep processing reports; far teleports do not
    if mover.is_player() && mover.is_being_teleported_far() {
        return Err(DropReason::FarTeleportInProgress(entity));
    }

    info.position.validate()?;

    sanitize(mover, info);

    if let Some(transport_info) = info.transport {
        let distance = info.position.distance_2d(mover.position());
        if distance > config.transport_skip_distance {
            // sent before a teleport
            trace!("Skipping stale transport report for {}", entity);
            return Err(DropReason::StaleTransportReport { distance });
        }

        let offset = &transport_info.offset;
        let limit = config.transport_offset_limit;
        if offset.x.abs() > limit || offset.y.abs() > limit || offset.z.abs() > limit {
            return Err(DropReason::TransportOffsetOutOfBounds);
        }

        info.position.offset_by(offset).validate()?;

        if mover.is_player() {
            match mover.transport() {
                None => {
                    if world.transport_exists(mover.map(), transport_info.transport) {
                        world.board_transport(entity, transport_info.transport);
                        mover.set_transport(Some(transport_info.transport));
                    }
                }
                Some(current) if current != transport_info.transport => {
                    world.leave_transport(entity, current);
                    if world.transport_exists(mover.map(), transport_info.transport) {
                        world.board_transport(entity, transport_info.transport);
                        mover.set_transport(Some(transport_info.transport));
                    } else {
                        mover.set_transport(None);
                        info.transport = None;
                    }
                }
                Some(_) => {}
            }
        }

        if mover.transport().is_none() {
            info.reset_transport();
        }
    } else if let Some(current) = mover.transport() {
        world.leave_transport(entity, current);
        mover.set_transport(None);
    }

    if mover.is_player() {
        let flying = info.flags.contains(MovementFlags::PLAYER_FLYING);
        let swimming = info.flags.contains(MovementFlags::SWIMMING);
        if flying && mover.is_in_water() {
            mover.set_in_water(false);
        } else if swimming != mover.is_in_water() {
            // clients drop the swimming flag while jumping under water
            let in_water =
                !mover.is_in_water() || world.is_under_water(mover.map(), &info.position);
            mover.set_in_water(in_water);
        }
    }

    if world.is_client_control_blocked(entity) && info.has_flag(MovementFlags::MASK_MOVING) {
        debug!("Ignoring movement of {} while client control is removed", entity);
        return Err(DropReason::ClientControlRemoved(entity));
    }

    mover.update_movement_info(info);

    Ok(())
}
