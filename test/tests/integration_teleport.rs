//! Near and far teleports, world teleports and summons.

use helm_server::{
    DropReason, FarTeleportEvent, HelmServerError, ProtocolViolation, TeleportState,
};
use helm_shared::{
    ClientMessage, EntityId, MapId, MovementOpcode, Position, ServerMessage, ServerMessageKind,
    SessionKey, WorldLocation,
};
use helm_test::{
    assert_dropped, assert_violation,
    test_world::{AREA_EAST, ZONE_EAST, ZONE_WEST},
    MovementBuilder, TestHarness, WorldCall,
};

/// alice drives her player, bob watches it
fn driven() -> (TestHarness, SessionKey, EntityId, SessionKey) {
    let mut harness = TestHarness::new();
    let (alice, player) = harness.add_player(1, 100, Position::new(10.0, 10.0, 0.0, 0.0));
    let (bob, _) = harness.add_player(2, 200, Position::new(20.0, 20.0, 0.0, 0.0));
    harness.observe(player, alice);
    harness.observe(player, bob);
    harness.take_control(alice, player);
    harness.server.take_events();
    (harness, alice, player, bob)
}

fn teleport_ack(entity: EntityId, counter: u32) -> ClientMessage {
    ClientMessage::TeleportAck {
        entity,
        counter,
        time: 0,
    }
}

#[test]
fn near_teleport_into_another_zone() {
    let (mut harness, alice, player, bob) = driven();
    let destination = Position::new(1500.0, 10.0, 0.0, 1.5);

    let counter = harness
        .server
        .teleport_near(&mut harness.world, player, destination)
        .unwrap();
    assert_eq!(counter, Some(1));

    match harness.messages_for(alice).as_slice() {
        [ServerMessage::MoveTeleport { counter, info, .. }] => {
            assert_eq!(*counter, 1);
            assert_eq!(info.position, destination);
        }
        other => panic!("expected a teleport instruction, got {:?}", other),
    }
    assert!(harness.messages_for(bob).is_empty());
    assert_eq!(
        *harness.server.entity(&player).unwrap().teleport_state(),
        TeleportState::NearPending { destination }
    );
    harness.take_outgoing();

    harness.send(alice, teleport_ack(player, 1)).unwrap();

    match harness.messages_for(bob).as_slice() {
        [ServerMessage::Teleported { info }] => {
            assert_eq!(info.entity, player);
            assert_eq!(info.position, destination);
        }
        other => panic!("expected a teleport broadcast, got {:?}", other),
    }
    assert_eq!(harness.count_for(alice, ServerMessageKind::Teleported), 0);

    let mover = harness.server.entity(&player).unwrap();
    assert_eq!(*mover.position(), destination);
    assert_eq!(*mover.teleport_state(), TeleportState::Idle);
    assert_eq!(mover.zone(), (ZONE_EAST, AREA_EAST));
    assert_eq!(mover.fall_information(), (0, 0.0));

    let world = &harness.world;
    assert!(world.has_call(&WorldCall::ZoneChanged(player, ZONE_WEST, ZONE_EAST)));
    assert!(world.has_call(&WorldCall::PetResummoned(player)));
    assert!(world.has_call(&WorldCall::DelayedOperations(player)));
    assert!(world.has_call(&WorldCall::MotionReinitialized(player)));
}

#[test]
fn distant_pet_follows_its_owner() {
    let (mut harness, alice, player, _bob) = driven();
    let pet = EntityId::new(900);
    harness
        .world
        .pets
        .insert(player, (pet, Position::new(10.0, 10.0, 0.0, 0.0)));

    let destination = Position::new(200.0, 10.0, 0.0, 0.0);
    harness
        .server
        .teleport_near(&mut harness.world, player, destination)
        .unwrap();
    harness.send(alice, teleport_ack(player, 1)).unwrap();

    assert!(harness
        .world
        .has_call(&WorldCall::PetRelocated(pet, destination)));
}

#[test]
fn nearby_pet_stays_put() {
    let (mut harness, alice, player, _bob) = driven();
    let pet = EntityId::new(900);
    harness
        .world
        .pets
        .insert(player, (pet, Position::new(10.0, 10.0, 0.0, 0.0)));

    harness
        .server
        .teleport_near(
            &mut harness.world,
            player,
            Position::new(50.0, 10.0, 0.0, 0.0),
        )
        .unwrap();
    harness.send(alice, teleport_ack(player, 1)).unwrap();

    assert_eq!(
        harness
            .world
            .count_calls(|call| matches!(call, WorldCall::PetRelocated(..))),
        0
    );
    assert!(harness.world.has_call(&WorldCall::PetResummoned(player)));
}

#[test]
fn drained_teleport_leaves_the_entity_in_place() {
    let (mut harness, _alice, player, _bob) = driven();

    harness
        .server
        .teleport_near(
            &mut harness.world,
            player,
            Position::new(500.0, 10.0, 0.0, 0.0),
        )
        .unwrap();
    harness.server.revoke_control(&player);

    let mover = harness.server.entity(&player).unwrap();
    assert_eq!(*mover.teleport_state(), TeleportState::Idle);
    assert_eq!(*mover.position(), Position::new(10.0, 10.0, 0.0, 0.0));
}

#[test]
fn invalid_near_destination_is_refused() {
    let (mut harness, alice, player, _bob) = driven();

    let result = harness.server.teleport_near(
        &mut harness.world,
        player,
        Position::new(f32::INFINITY, 0.0, 0.0, 0.0),
    );
    assert!(matches!(result, Err(HelmServerError::InvalidPosition(_))));
    assert!(harness.messages_for(alice).is_empty());
}

#[test]
fn undriven_creature_teleports_at_once() {
    let (mut harness, _alice, _player, bob) = driven();
    let wolf = harness.add_creature(300, Position::new(40.0, 40.0, 0.0, 0.0));
    harness.observe(wolf, bob);

    let destination = Position::new(60.0, 40.0, 0.0, 0.0);
    let counter = harness
        .server
        .teleport_near(&mut harness.world, wolf, destination)
        .unwrap();
    assert_eq!(counter, None);

    assert_eq!(harness.count_for(bob, ServerMessageKind::Teleported), 1);
    assert_eq!(*harness.server.entity(&wolf).unwrap().position(), destination);
    assert!(harness
        .world
        .has_call(&WorldCall::MotionReinitialized(wolf)));
    assert!(!harness.world.has_call(&WorldCall::PetResummoned(wolf)));
}

#[test]
fn far_teleport_round_trip() {
    let (mut harness, alice, player, _bob) = driven();
    let location = WorldLocation::new(MapId(1), Position::new(5.0, 5.0, 0.0, 0.0));

    let counter = harness
        .server
        .teleport_to(&mut harness.world, player, location)
        .unwrap();
    assert_eq!(counter, None);
    assert_eq!(
        harness.messages_for(alice),
        vec![
            ServerMessage::TransferPending { map: MapId(1) },
            ServerMessage::NewWorld { location },
        ]
    );
    assert!(harness
        .server
        .entity(&player)
        .unwrap()
        .is_being_teleported_far());

    let info = MovementBuilder::new(player, 11.0, 10.0, 0.0).build();
    assert_dropped!(
        harness.report(alice, MovementOpcode::Heartbeat, info),
        DropReason::FarTeleportInProgress(_)
    );

    harness.send(alice, ClientMessage::WorldportAck).unwrap();

    let mover = harness.server.entity(&player).unwrap();
    assert_eq!(mover.location(), location);
    assert_eq!(*mover.teleport_state(), TeleportState::Idle);
    assert!(harness
        .world
        .has_call(&WorldCall::EnteredMap(player, location)));
    assert!(harness
        .world
        .has_call(&WorldCall::MapEntered(player, MapId(1))));

    let mut events = harness.server.take_events();
    let arrivals: Vec<_> = events.read::<FarTeleportEvent>().collect();
    assert_eq!(arrivals, vec![(player, location)]);

    // the player may move again on the new map
    let info = MovementBuilder::new(player, 6.0, 5.0, 0.0).build();
    assert!(harness
        .report(alice, MovementOpcode::Heartbeat, info)
        .is_ok());
}

#[test]
fn unreachable_map_sends_the_player_home() {
    let (mut harness, alice, player, _bob) = driven();
    harness.world.unreachable_maps.insert(MapId(1));
    let home = harness.world.homebind;

    harness
        .server
        .teleport_far(
            player,
            WorldLocation::new(MapId(1), Position::new(5.0, 5.0, 0.0, 0.0)),
        )
        .unwrap();
    harness.send(alice, ClientMessage::WorldportAck).unwrap();

    assert_eq!(harness.server.entity(&player).unwrap().location(), home);
    let mut events = harness.server.take_events();
    assert_eq!(
        events.read::<FarTeleportEvent>().collect::<Vec<_>>(),
        vec![(player, home)]
    );
}

#[test]
fn invalid_far_destination_is_a_violation() {
    let (mut harness, alice, player, _bob) = driven();

    harness
        .server
        .teleport_far(
            player,
            WorldLocation::new(MapId(9), Position::new(5.0, 5.0, 0.0, 0.0)),
        )
        .unwrap();
    assert_violation!(
        harness.send(alice, ClientMessage::WorldportAck),
        ProtocolViolation::InvalidTeleportDestination { .. }
    );
    assert!(harness.server.session(&alice).unwrap().is_kicked());
    assert_eq!(
        harness.server.entity(&player).unwrap().location().map,
        MapId(0)
    );
}

#[test]
fn instance_reset_warning_on_arrival() {
    let (mut harness, alice, player, _bob) = driven();
    harness.world.reset_warnings.insert(MapId(1), 3600);

    harness
        .server
        .teleport_far(
            player,
            WorldLocation::new(MapId(1), Position::new(5.0, 5.0, 0.0, 0.0)),
        )
        .unwrap();
    harness.take_outgoing();
    harness.send(alice, ClientMessage::WorldportAck).unwrap();

    assert_eq!(
        harness.messages_for(alice),
        vec![ServerMessage::InstanceResetWarning {
            map: MapId(1),
            time_left: 3600,
        }]
    );
}

#[test]
fn worldport_without_a_pending_teleport_is_dropped() {
    let (mut harness, alice, _player, _bob) = driven();

    assert_dropped!(
        harness.send(alice, ClientMessage::WorldportAck),
        DropReason::NoFarTeleportPending(_)
    );
    assert!(!harness.server.session(&alice).unwrap().is_kicked());
}

#[test]
fn far_teleport_needs_an_owning_session() {
    let mut harness = TestHarness::new();
    let wolf = harness.add_creature(300, Position::new(40.0, 40.0, 0.0, 0.0));

    let result = harness.server.teleport_far(
        wolf,
        WorldLocation::new(MapId(1), Position::new(5.0, 5.0, 0.0, 0.0)),
    );
    assert!(matches!(result, Err(HelmServerError::NoOwningSession(_))));
}

#[test]
fn world_teleport_requires_privilege() {
    let (mut harness, alice, player, _bob) = driven();
    let destination = Position::new(70.0, 10.0, 0.0, 0.0);
    let request = ClientMessage::WorldTeleport {
        time: 0,
        location: WorldLocation::new(MapId(0), destination),
    };

    assert_dropped!(
        harness.send(alice, request.clone()),
        DropReason::NotPrivileged
    );

    harness.world.privileged.insert(alice);
    harness.send(alice, request.clone()).unwrap();
    assert_eq!(harness.count_for(alice, ServerMessageKind::MoveTeleport), 1);
    assert_eq!(
        *harness.server.entity(&player).unwrap().teleport_state(),
        TeleportState::NearPending { destination }
    );

    harness.world.in_flight.insert(player);
    assert_dropped!(harness.send(alice, request), DropReason::InFlight(_));
}

#[test]
fn summon_response_is_forwarded_when_possible() {
    let (mut harness, alice, player, _bob) = driven();
    let summoner = EntityId::new(200);

    harness
        .send(
            alice,
            ClientMessage::SummonResponse {
                summoner,
                agree: true,
            },
        )
        .unwrap();
    assert!(harness
        .world
        .has_call(&WorldCall::Summoned(player, summoner, true)));

    harness.world.in_combat.insert(player);
    assert_dropped!(
        harness.send(
            alice,
            ClientMessage::SummonResponse {
                summoner,
                agree: true,
            }
        ),
        DropReason::CannotBeSummoned(_)
    );
}
