//! Movement reports: validation, relay to observers and the consequences
//! of an accepted position.

use helm_server::{DropReason, HandoffEvent, KickEvent, ProtocolViolation};
use helm_shared::{
    ClientMessage, EntityId, FlagToggle, MapId, MovementFlags, MovementOpcode, Position,
    ServerMessage, SessionKey, TransportId, WorldLocation,
};
use helm_test::{assert_dropped, assert_violation, MovementBuilder, TestHarness, WorldCall};

const TRANSPORT: TransportId = TransportId(77);

/// alice drives her player, bob watches it
fn driven() -> (TestHarness, SessionKey, EntityId, SessionKey) {
    let mut harness = TestHarness::new();
    let (alice, player) = harness.add_player(1, 100, Position::new(10.0, 10.0, 0.0, 0.0));
    let (bob, _) = harness.add_player(2, 200, Position::new(20.0, 20.0, 0.0, 0.0));
    harness.observe(player, alice);
    harness.observe(player, bob);
    harness.take_control(alice, player);
    (harness, alice, player, bob)
}

#[test]
fn accepted_report_is_relayed_to_observers_only() {
    let (mut harness, alice, player, bob) = driven();

    let info = MovementBuilder::new(player, 12.0, 10.0, 0.0)
        .flags(MovementFlags::FORWARD)
        .time(1000)
        .build();
    harness
        .report(alice, MovementOpcode::StartForward, info)
        .expect("report should be accepted");

    assert_eq!(
        harness.messages_for(bob),
        vec![ServerMessage::MovementRelay {
            opcode: MovementOpcode::StartForward,
            info,
        }]
    );
    assert!(harness.messages_for(alice).is_empty());

    let mover = harness.server.entity(&player).unwrap();
    assert_eq!(*mover.position(), Position::new(12.0, 10.0, 0.0, 0.0));
    assert_eq!(harness.server.anti_cheat().reports.len(), 1);
    assert!(harness.world.has_call(&WorldCall::MarkedMoved(player)));
}

#[test]
fn invalid_position_is_dropped_silently() {
    let (mut harness, alice, player, bob) = driven();

    let info = MovementBuilder::new(player, f32::NAN, 10.0, 0.0).build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::InvalidPosition(_)
    );

    let far = MovementBuilder::new(player, 10.0, 40000.0, 0.0).build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, far),
        DropReason::InvalidPosition(_)
    );

    assert!(harness.messages_for(bob).is_empty());
    assert_eq!(
        *harness.server.entity(&player).unwrap().position(),
        Position::new(10.0, 10.0, 0.0, 0.0)
    );
    assert!(harness.server.anti_cheat().reports.is_empty());
    assert!(!harness.server.session(&alice).unwrap().is_kicked());
}

#[test]
fn reports_for_undriven_entity_are_counted_then_kicked() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();

    let (mut harness, alice, player, bob) = driven();
    let info = MovementBuilder::new(player, 11.0, 10.0, 0.0).build();

    for _ in 0..3 {
        assert_dropped!(
            harness.report(bob, MovementOpcode::Heartbeat, info),
            DropReason::NotDriving(_)
        );
    }
    assert_violation!(
        harness.report(bob, MovementOpcode::Heartbeat, info),
        ProtocolViolation::RepeatedUnauthorizedMoves { count: 4, .. }
    );

    assert_eq!(harness.server.anti_cheat().unauthorized.len(), 4);
    assert!(harness.server.session(&bob).unwrap().is_kicked());
    assert_dropped!(
        harness.report(bob, MovementOpcode::Heartbeat, info),
        DropReason::SessionKicked
    );

    let mut events = harness.server.take_events();
    assert_eq!(events.read::<KickEvent>().count(), 1);
    // alice was never affected
    assert_eq!(harness.server.driver_of(&player), Some(alice));
}

#[test]
fn transport_offset_beyond_bound_is_dropped() {
    let (mut harness, alice, player, bob) = driven();
    harness
        .world
        .add_transport(TRANSPORT, MapId(0), Position::new(0.0, 0.0, 0.0, 0.0));

    let info = MovementBuilder::new(player, 10.0, 10.0, 0.0)
        .on_transport(TRANSPORT, Position::new(80.0, 0.0, 0.0, 0.0))
        .build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::TransportOffsetOutOfBounds
    );
    assert!(harness.messages_for(bob).is_empty());
    assert_eq!(harness.server.entity(&player).unwrap().transport(), None);
}

#[test]
fn transport_report_from_before_a_teleport_is_skipped() {
    let (mut harness, alice, player, _bob) = driven();
    harness
        .world
        .add_transport(TRANSPORT, MapId(0), Position::new(600.0, 10.0, 0.0, 0.0));

    let info = MovementBuilder::new(player, 610.0, 10.0, 0.0)
        .on_transport(TRANSPORT, Position::new(10.0, 0.0, 0.0, 0.0))
        .build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::StaleTransportReport { .. }
    );
}

#[test]
fn boarding_and_leaving_a_transport() {
    let (mut harness, alice, player, _bob) = driven();
    harness
        .world
        .add_transport(TRANSPORT, MapId(0), Position::new(10.0, 10.0, 0.0, 0.0));

    let aboard = MovementBuilder::new(player, 12.0, 10.0, 0.0)
        .on_transport(TRANSPORT, Position::new(2.0, 0.0, 1.0, 0.0))
        .build();
    harness
        .report(alice, MovementOpcode::ChangeTransport, aboard)
        .expect("boarding should be accepted");

    assert!(harness
        .world
        .has_call(&WorldCall::Boarded(player, TRANSPORT)));
    let mover = harness.server.entity(&player).unwrap();
    assert_eq!(mover.transport(), Some(TRANSPORT));
    // tracked at origin + offset
    assert_eq!(*mover.position(), Position::new(12.0, 10.0, 1.0, 0.0));

    let ashore = MovementBuilder::new(player, 14.0, 10.0, 0.0).build();
    harness
        .report(alice, MovementOpcode::Heartbeat, ashore)
        .expect("leaving should be accepted");
    assert!(harness.world.has_call(&WorldCall::Left(player, TRANSPORT)));
    assert_eq!(harness.server.entity(&player).unwrap().transport(), None);
}

#[test]
fn unknown_transport_is_not_boarded() {
    let (mut harness, alice, player, bob) = driven();

    let info = MovementBuilder::new(player, 12.0, 10.0, 0.0)
        .on_transport(TransportId(5), Position::new(2.0, 0.0, 0.0, 0.0))
        .build();
    harness
        .report(alice, MovementOpcode::Heartbeat, info)
        .expect("report should be accepted");

    let relayed = harness.messages_for(bob);
    match relayed.as_slice() {
        [ServerMessage::MovementRelay { info, .. }] => {
            assert!(info.transport.is_none());
            assert!(!info.has_flag(MovementFlags::ON_TRANSPORT));
        }
        other => panic!("unexpected relay {:?}", other),
    }
}

#[test]
fn set_fly_is_relayed_as_swim_cheat() {
    let (mut harness, alice, player, bob) = driven();

    let falling = MovementBuilder::new(player, 10.0, 10.0, 5.0)
        .falling(200)
        .build();
    harness
        .report(alice, MovementOpcode::SetFly, falling)
        .unwrap();
    let grounded = MovementBuilder::new(player, 10.0, 10.0, 0.0).build();
    harness
        .report(alice, MovementOpcode::SetFly, grounded)
        .unwrap();

    let opcodes: Vec<MovementOpcode> = harness
        .messages_for(bob)
        .into_iter()
        .filter_map(|message| match message {
            ServerMessage::MovementRelay { opcode, .. } => Some(opcode),
            _ => None,
        })
        .collect();
    assert_eq!(
        opcodes,
        vec![MovementOpcode::StartSwimCheat, MovementOpcode::StopSwimCheat]
    );
}

#[test]
fn unearned_flight_flags_are_stripped_before_relay() {
    let (mut harness, alice, player, bob) = driven();

    let info = MovementBuilder::new(player, 10.0, 10.0, 30.0)
        .flags(MovementFlags::CAN_FLY | MovementFlags::PLAYER_FLYING | MovementFlags::FORWARD)
        .build();
    harness
        .report(alice, MovementOpcode::StartForward, info)
        .unwrap();

    let merged = harness.server.entity(&player).unwrap().movement_info().flags;
    assert_eq!(merged, MovementFlags::FORWARD);
    match harness.messages_for(bob).as_slice() {
        [ServerMessage::MovementRelay { info, .. }] => {
            assert_eq!(info.flags, MovementFlags::FORWARD)
        }
        other => panic!("unexpected relay {:?}", other),
    }
    assert!(!harness
        .server
        .entity(&player)
        .unwrap()
        .has_capability(FlagToggle::CanFly));
}

#[test]
fn removed_client_control_blocks_moving_reports() {
    let (mut harness, alice, player, _bob) = driven();
    harness.world.control_blocked.insert(player);

    let moving = MovementBuilder::new(player, 11.0, 10.0, 0.0)
        .flags(MovementFlags::FORWARD)
        .build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::StartForward, moving),
        DropReason::ClientControlRemoved(_)
    );

    let still = MovementBuilder::new(player, 10.0, 10.0, 0.0)
        .flags(MovementFlags::TURN_LEFT)
        .build();
    assert!(harness
        .report(alice, MovementOpcode::StartTurnLeft, still)
        .is_ok());
}

#[test]
fn reports_are_dropped_while_teleporting_far() {
    let (mut harness, alice, player, _bob) = driven();
    harness
        .server
        .teleport_far(
            player,
            WorldLocation::new(MapId(1), Position::new(5.0, 5.0, 0.0, 0.0)),
        )
        .unwrap();

    let info = MovementBuilder::new(player, 11.0, 10.0, 0.0).build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::FarTeleportInProgress(_)
    );
    assert!(!harness.server.session(&alice).unwrap().is_kicked());
}

#[test]
fn landing_hands_the_fall_to_the_world() {
    let (mut harness, alice, player, _bob) = driven();

    let apex = MovementBuilder::new(player, 10.0, 10.0, 20.0)
        .falling(100)
        .build();
    harness.report(alice, MovementOpcode::Jump, apex).unwrap();

    let land = MovementBuilder::new(player, 10.0, 10.0, 0.0)
        .fall_time(900)
        .build();
    harness
        .report(alice, MovementOpcode::FallLand, land)
        .unwrap();

    let falls: Vec<&WorldCall> = harness
        .world
        .calls
        .iter()
        .filter(|call| matches!(call, WorldCall::Fall(_)))
        .collect();
    match falls.as_slice() {
        [WorldCall::Fall(report)] => {
            assert_eq!(report.entity, player);
            assert_eq!(report.start_z, 20.0);
            assert_eq!(report.land_z, 0.0);
            assert_eq!(report.fall_time, 900);
        }
        other => panic!("expected one fall, got {:?}", other),
    }
    assert_eq!(
        harness.server.entity(&player).unwrap().fall_information(),
        (900, 0.0)
    );
}

#[test]
fn landing_during_a_flight_path_is_ignored() {
    let (mut harness, alice, player, _bob) = driven();
    harness.world.in_flight.insert(player);

    let land = MovementBuilder::new(player, 10.0, 10.0, 0.0)
        .fall_time(900)
        .build();
    harness
        .report(alice, MovementOpcode::FallLand, land)
        .unwrap();

    assert_eq!(
        harness
            .world
            .count_calls(|call| matches!(call, WorldCall::Fall(_))),
        0
    );
}

#[test]
fn moving_makes_a_sitting_entity_stand() {
    let (mut harness, alice, player, _bob) = driven();
    harness.world.sitting.insert(player);

    let info = MovementBuilder::new(player, 11.0, 10.0, 0.0)
        .flags(MovementFlags::FORWARD)
        .build();
    harness
        .report(alice, MovementOpcode::StartForward, info)
        .unwrap();

    assert!(harness.world.has_call(&WorldCall::StoodUp(player)));
}

#[test]
fn safe_position_only_tracks_grounded_free_movement() {
    let (mut harness, alice, player, _bob) = driven();

    let grounded = MovementBuilder::new(player, 15.0, 10.0, 0.0).build();
    harness
        .report(alice, MovementOpcode::Heartbeat, grounded)
        .unwrap();
    let jumping = MovementBuilder::new(player, 16.0, 10.0, 3.0)
        .falling(50)
        .build();
    harness.report(alice, MovementOpcode::Jump, jumping).unwrap();
    harness.world.held.insert(player);
    let held = MovementBuilder::new(player, 17.0, 10.0, 0.0).build();
    harness
        .report(alice, MovementOpcode::Heartbeat, held)
        .unwrap();

    assert_eq!(
        harness.server.entity(&player).unwrap().safe_position(),
        Some(&Position::new(15.0, 10.0, 0.0, 0.0))
    );
}

#[test]
fn time_skipped_is_relayed_to_observers() {
    let (mut harness, alice, player, bob) = driven();

    harness
        .send(
            alice,
            ClientMessage::TimeSkipped {
                entity: player,
                time_skipped: 250,
            },
        )
        .unwrap();

    assert_eq!(
        harness.messages_for(bob),
        vec![ServerMessage::TimeSkippedRelay {
            entity: player,
            time_skipped: 250,
        }]
    );
    assert!(harness.messages_for(alice).is_empty());
}

#[test]
fn reports_during_handoff_are_refused_without_penalty() {
    let (mut harness, alice, player, _bob) = driven();
    let horse = harness.add_creature(300, Position::new(30.0, 30.0, 0.0, 0.0));

    harness
        .server
        .grant_control(&harness.world, horse, alice)
        .unwrap();
    harness
        .send(alice, ClientMessage::SetActiveMover { entity: horse })
        .unwrap();

    let info = MovementBuilder::new(horse, 31.0, 30.0, 0.0).build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::HandoffInProgress(_)
    );

    let session = harness.server.session(&alice).unwrap();
    assert_eq!(session.unauthorized_moves(), 0);
    assert!(!session.is_kicked());

    let mut events = harness.server.take_events();
    assert!(events.read::<HandoffEvent>().any(|(session, previous, current)| {
        session == alice && previous == Some(player) && current == Some(horse)
    }));
}
