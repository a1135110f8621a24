//! Engine tick integration tests for the tween engine and the entity update
//! scheduler.

use std::sync::atomic::{AtomicU32, Ordering};

use bevy_ecs::prelude::*;
use glam::Vec2;

use critterscript::components::animation::AnimationPlayer;
use critterscript::components::mapposition::MapPosition;
use critterscript::components::script::{Script, ScriptContext, ScriptError, ScriptHook};
use critterscript::components::timer::{ScriptTimers, TimerId};
use critterscript::components::tween::{Easing, Tween, TweenSlot};
use critterscript::game::update_schedule;
use critterscript::resources::gameconfig::GameConfig;
use critterscript::resources::worldtime::WorldTime;
use critterscript::systems::script::script_update_system;
use critterscript::systems::time::update_world_time;

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(config: GameConfig) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config);
    world
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

fn noop_update(_: Entity, _: f32, _: &mut ScriptContext) -> Result<(), ScriptError> {
    Ok(())
}

fn ticking_script() -> Script {
    Script::new("test").on_update(noop_update)
}

fn spawn_tweening(world: &mut World, from: Vec2, tween: Tween<Vec2>, script: Script) -> Entity {
    let mut slot = TweenSlot::new();
    slot.attach(tween);
    world
        .spawn((MapPosition { pos: from }, slot, script))
        .id()
}

fn position(world: &World, entity: Entity) -> Vec2 {
    world.get::<MapPosition>(entity).unwrap().pos
}

// ==================== TWEEN ENGINE ====================

static LANDED: AtomicU32 = AtomicU32::new(0);

fn count_landed(_: Entity, _: &mut ScriptContext) -> Result<(), ScriptError> {
    LANDED.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn tween_lands_exactly_on_target_and_fires_once() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let from = Vec2::new(3.0, -7.0);
    let to = Vec2::new(-117.3, 42.1);
    let tween = Tween::new(from, to, 1.0)
        .with_easing(Easing::CubicInOut)
        .with_on_complete(count_landed);
    let e = spawn_tweening(&mut world, from, tween, ticking_script());

    for _ in 0..3 {
        tick(&mut world, &mut schedule, 0.3);
    }
    assert_ne!(position(&world, e), to);
    assert_eq!(LANDED.load(Ordering::SeqCst), 0);

    tick(&mut world, &mut schedule, 0.3);
    assert_eq!(position(&world, e), to);
    assert_eq!(LANDED.load(Ordering::SeqCst), 1);

    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.3);
    }
    assert_eq!(position(&world, e), to);
    assert_eq!(LANDED.load(Ordering::SeqCst), 1);
    let slot = world.get::<TweenSlot>(e).unwrap();
    assert_eq!(slot.completed, 1);
    assert!(!slot.is_active());
}

#[test]
fn tween_moves_linearly_between_ticks() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(100.0, 50.0), 2.0);
    let e = spawn_tweening(&mut world, Vec2::ZERO, tween, ticking_script());

    tick(&mut world, &mut schedule, 0.5);
    let pos = position(&world, e);
    assert!(approx_eq(pos.x, 25.0));
    assert!(approx_eq(pos.y, 12.5));
}

#[test]
fn zero_duration_completes_on_first_advance() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let to = Vec2::new(9.0, 9.0);
    let e = spawn_tweening(
        &mut world,
        Vec2::ZERO,
        Tween::new(Vec2::ZERO, to, 0.0),
        ticking_script(),
    );

    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(position(&world, e), to);
    assert_eq!(world.get::<TweenSlot>(e).unwrap().completed, 1);
}

fn restart_instantly(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    let pos = ctx.position(entity)?;
    ctx.move_to(
        entity,
        pos + Vec2::X,
        0.0,
        "lerp",
        Some(restart_instantly as ScriptHook),
    )
}

#[test]
fn instant_chains_are_capped_per_tick() {
    let mut config = GameConfig::new();
    config.max_completions_per_tick = 8;
    let mut world = make_world(config);
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::ZERO, 0.0).with_on_complete(restart_instantly);
    let e = spawn_tweening(&mut world, Vec2::ZERO, tween, ticking_script());

    tick(&mut world, &mut schedule, 0.016);
    let slot = world.get::<TweenSlot>(e).unwrap();
    assert_eq!(slot.completed, 8);
    assert!(slot.is_active());

    tick(&mut world, &mut schedule, 0.016);
    assert_eq!(world.get::<TweenSlot>(e).unwrap().completed, 16);
}

static REPLACED_FIRED: AtomicU32 = AtomicU32::new(0);

fn count_replaced(_: Entity, _: &mut ScriptContext) -> Result<(), ScriptError> {
    REPLACED_FIRED.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn replaced_tween_never_fires() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let first = Tween::new(Vec2::ZERO, Vec2::ONE, 1.0).with_on_complete(count_replaced);
    let e = spawn_tweening(&mut world, Vec2::ZERO, first, ticking_script());

    tick(&mut world, &mut schedule, 0.5);
    let here = position(&world, e);
    world
        .get_mut::<TweenSlot>(e)
        .unwrap()
        .attach(Tween::new(here, Vec2::new(5.0, 5.0), 0.5));

    for _ in 0..4 {
        tick(&mut world, &mut schedule, 0.5);
    }
    assert_eq!(position(&world, e), Vec2::new(5.0, 5.0));
    assert_eq!(REPLACED_FIRED.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_easing_falls_back_to_lerp() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.move_to(entity, Vec2::new(100.0, 0.0), 1000.0, "bouncy", None)
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = world
        .spawn((
            MapPosition::default(),
            TweenSlot::new(),
            Script::new("test").on_start(start).on_update(noop_update),
        ))
        .id();

    tick(&mut world, &mut schedule, 0.25);
    let tween = world.get::<TweenSlot>(e).unwrap().active.unwrap();
    assert_eq!(tween.easing, Easing::Linear);
    assert!(approx_eq(position(&world, e).x, 25.0));
}

// ==================== SCHEDULER ====================

static ORDER_SEEN: AtomicU32 = AtomicU32::new(0);

fn record_position(entity: Entity, _: f32, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    let pos = ctx.position(entity)?;
    ORDER_SEEN.store(pos.x.to_bits(), Ordering::SeqCst);
    Ok(())
}

#[test]
fn update_observes_post_tween_position() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
    spawn_tweening(
        &mut world,
        Vec2::ZERO,
        tween,
        Script::new("test").on_update(record_position),
    );

    tick(&mut world, &mut schedule, 0.5);
    let seen = f32::from_bits(ORDER_SEEN.load(Ordering::SeqCst));
    assert!(approx_eq(seen, 5.0));
}

static STARTS: AtomicU32 = AtomicU32::new(0);
static UPDATES_AFTER_START: AtomicU32 = AtomicU32::new(0);

fn count_start(_: Entity, _: &mut ScriptContext) -> Result<(), ScriptError> {
    STARTS.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

fn count_update(_: Entity, _: f32, _: &mut ScriptContext) -> Result<(), ScriptError> {
    assert_eq!(STARTS.load(Ordering::SeqCst), 1);
    UPDATES_AFTER_START.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn start_runs_once_before_first_update() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = world
        .spawn(Script::new("test").on_start(count_start).on_update(count_update))
        .id();

    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(STARTS.load(Ordering::SeqCst), 1);
    assert_eq!(UPDATES_AFTER_START.load(Ordering::SeqCst), 5);
    assert!(world.get::<Script>(e).unwrap().started);
}

#[test]
fn entity_without_update_never_advances_by_default() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
    let e = spawn_tweening(&mut world, Vec2::ZERO, tween, Script::new("still"));

    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.5);
    }
    assert_eq!(position(&world, e), Vec2::ZERO);
    assert!(world.get::<TweenSlot>(e).unwrap().is_active());
}

#[test]
fn entity_without_update_advances_when_configured() {
    let mut config = GameConfig::new();
    config.advance_tweens_without_update = true;
    let mut world = make_world(config);
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
    let e = spawn_tweening(&mut world, Vec2::ZERO, tween, Script::new("still"));

    for _ in 0..2 {
        tick(&mut world, &mut schedule, 0.5);
    }
    assert_eq!(position(&world, e), Vec2::new(10.0, 0.0));
}

#[test]
fn update_before_start_fails_and_disables() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = Schedule::default();
    schedule.add_systems(script_update_system);
    let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
    let e = spawn_tweening(&mut world, Vec2::ZERO, tween, ticking_script());

    tick(&mut world, &mut schedule, 0.5);
    let script = world.get::<Script>(e).unwrap();
    assert!(!script.enabled);
    assert_eq!(
        script.update_hook().err(),
        Some(ScriptError::NotStarted {
            script: "test".into()
        })
    );
    assert_eq!(position(&world, e), Vec2::ZERO);
}

static FAILING_CALLS: AtomicU32 = AtomicU32::new(0);

fn failing_update(entity: Entity, _: f32, _: &mut ScriptContext) -> Result<(), ScriptError> {
    FAILING_CALLS.fetch_add(1, Ordering::SeqCst);
    Err(ScriptError::MissingPosition(entity))
}

#[test]
fn failing_hook_disables_only_its_script() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let bad = world
        .spawn(Script::new("bad").on_update(failing_update))
        .id();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(4.0, 0.0), 1.0);
    let good = spawn_tweening(&mut world, Vec2::ZERO, tween, ticking_script());

    for _ in 0..4 {
        tick(&mut world, &mut schedule, 0.25);
    }
    assert_eq!(FAILING_CALLS.load(Ordering::SeqCst), 1);
    assert!(!world.get::<Script>(bad).unwrap().enabled);
    assert!(world.get::<Script>(good).unwrap().enabled);
    assert_eq!(position(&world, good), Vec2::new(4.0, 0.0));
}

#[test]
fn move_to_without_position_fails_fast() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.move_to(entity, Vec2::ONE, 100.0, "lerp", None)
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = world
        .spawn((TweenSlot::new(), Script::new("nowhere").on_start(start)))
        .id();

    tick(&mut world, &mut schedule, 0.1);
    assert!(!world.get::<Script>(e).unwrap().enabled);
    assert!(!world.get::<TweenSlot>(e).unwrap().is_active());
}

#[test]
fn time_scale_multiplies_entity_delta() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let tween = Tween::new(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0);
    let fast = spawn_tweening(
        &mut world,
        Vec2::ZERO,
        tween,
        ticking_script().with_time_scale(2.0),
    );
    let normal = spawn_tweening(&mut world, Vec2::ZERO, tween, ticking_script());

    tick(&mut world, &mut schedule, 0.25);
    assert!(approx_eq(position(&world, fast).x, 5.0));
    assert!(approx_eq(position(&world, normal).x, 2.5));
}

// ==================== TIMERS ====================

fn noop_once(_: Entity, _: &mut ScriptContext) -> Result<(), ScriptError> {
    Ok(())
}

fn spawn_timed(world: &mut World, script: Script) -> Entity {
    world
        .spawn((MapPosition::default(), ScriptTimers::new(), script))
        .id()
}

fn fired(world: &World, entity: Entity) -> u32 {
    world.get::<ScriptTimers>(entity).unwrap().fired
}

#[test]
fn delay_fires_once_after_its_delay() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.delay(entity, 250.0, noop_once).map(|_| ())
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, ticking_script().on_start(start));

    for _ in 0..2 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(fired(&world, e), 0);

    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(fired(&world, e), 1);
    assert!(world.get::<ScriptTimers>(e).unwrap().is_empty());

    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(fired(&world, e), 1);
}

#[test]
fn delay_at_default_fps_fires_on_exact_tick() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.delay(entity, 1000.0, noop_once).map(|_| ())
    }
    let config = GameConfig::new();
    let dt = config.tick_delta();
    let mut world = make_world(config);
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, ticking_script().on_start(start));

    for _ in 0..59 {
        tick(&mut world, &mut schedule, dt);
    }
    assert_eq!(fired(&world, e), 0);
    tick(&mut world, &mut schedule, dt);
    assert_eq!(fired(&world, e), 1);
}

static INTERVAL_RUNS: AtomicU32 = AtomicU32::new(0);

fn three_times(_: Entity, _: &mut ScriptContext) -> Result<bool, ScriptError> {
    Ok(INTERVAL_RUNS.fetch_add(1, Ordering::SeqCst) + 1 < 3)
}

#[test]
fn interval_repeats_until_it_returns_false() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.interval(entity, 100.0, three_times).map(|_| ())
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, ticking_script().on_start(start));

    tick(&mut world, &mut schedule, 0.1);
    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(INTERVAL_RUNS.load(Ordering::SeqCst), 2);
    assert_eq!(world.get::<ScriptTimers>(e).unwrap().len(), 1);

    for _ in 0..8 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(INTERVAL_RUNS.load(Ordering::SeqCst), 3);
    assert!(world.get::<ScriptTimers>(e).unwrap().is_empty());
}

static VICTIM_ID: AtomicU32 = AtomicU32::new(u32::MAX);
static VICTIM_RUNS: AtomicU32 = AtomicU32::new(0);

fn victim(_: Entity, _: &mut ScriptContext) -> Result<(), ScriptError> {
    VICTIM_RUNS.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

fn cancel_victim(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    let id = TimerId(VICTIM_ID.load(Ordering::SeqCst));
    assert!(ctx.cancel(entity, id));
    assert!(!ctx.cancel(entity, id));
    Ok(())
}

#[test]
fn cancelled_timer_never_fires_even_when_due_same_tick() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.delay(entity, 100.0, cancel_victim)?;
        let id = ctx.delay(entity, 100.0, victim)?;
        VICTIM_ID.store(id.0, Ordering::SeqCst);
        Ok(())
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, ticking_script().on_start(start));

    for _ in 0..5 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(VICTIM_RUNS.load(Ordering::SeqCst), 0);
    assert_eq!(fired(&world, e), 1);
    assert!(world.get::<Script>(e).unwrap().enabled);
    assert!(world.get::<ScriptTimers>(e).unwrap().is_empty());
}

fn schedule_short_delay(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    ctx.delay(entity, 100.0, noop_once).map(|_| ())
}

#[test]
fn timers_without_update_stall_by_default() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, Script::new("still").on_start(schedule_short_delay));

    for _ in 0..10 {
        tick(&mut world, &mut schedule, 0.1);
    }
    assert_eq!(fired(&world, e), 0);
    assert_eq!(world.get::<ScriptTimers>(e).unwrap().len(), 1);
}

#[test]
fn timers_without_update_fire_when_configured() {
    let mut config = GameConfig::new();
    config.advance_tweens_without_update = true;
    let mut world = make_world(config);
    let mut schedule = update_schedule();
    let e = spawn_timed(&mut world, Script::new("still").on_start(schedule_short_delay));

    tick(&mut world, &mut schedule, 0.1);
    assert_eq!(fired(&world, e), 1);
}

#[test]
fn delay_without_timer_list_fails_fast() {
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = world
        .spawn((
            MapPosition::default(),
            ticking_script().on_start(schedule_short_delay),
        ))
        .id();

    tick(&mut world, &mut schedule, 0.1);
    assert!(!world.get::<Script>(e).unwrap().enabled);
}

// ==================== ANIMATION CONTROL AND DESTROY ====================

#[test]
fn hooks_layer_and_stop_single_clips() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.play_animation(entity, "walk_left");
        ctx.play_animation_with(entity, "walk_up", false);
        Ok(())
    }
    fn update(entity: Entity, _: f32, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.stop_animation(entity, "walk_left");
        Ok(())
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let e = world
        .spawn((
            MapPosition::default(),
            AnimationPlayer::new().with_clips(["walk_left", "walk_up"]),
            Script::new("layers").on_start(start).on_update(update),
        ))
        .id();

    tick(&mut world, &mut schedule, 0.1);
    let player = world.get::<AnimationPlayer>(e).unwrap();
    assert_eq!(player.playing_clips(), vec!["walk_up"]);
    assert_eq!(player.requests, 2);
}

fn destroy_self(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
    ctx.destroy(entity);
    Ok(())
}

#[test]
fn destroy_from_timer_despawns_after_tick() {
    fn start(entity: Entity, ctx: &mut ScriptContext) -> Result<(), ScriptError> {
        ctx.delay(entity, 200.0, destroy_self).map(|_| ())
    }
    let mut world = make_world(GameConfig::new());
    let mut schedule = update_schedule();
    let doomed = spawn_timed(&mut world, ticking_script().on_start(start));
    let other = spawn_timed(&mut world, ticking_script());

    tick(&mut world, &mut schedule, 0.1);
    assert!(world.get::<Script>(doomed).is_some());

    tick(&mut world, &mut schedule, 0.1);
    assert!(world.get::<Script>(doomed).is_none());
    assert!(world.get::<MapPosition>(doomed).is_none());
    assert!(world.get::<Script>(other).unwrap().enabled);

    tick(&mut world, &mut schedule, 0.1);
    assert!(world.get::<Script>(other).is_some());
}
