//! Cinematic engine integration tests.
//!
//! Drives scenes and sequencers tick by tick against a recording director
//! and checks when actions, predicates and finalizers fire.

use wandcrafter::cinematic::{Director, Scene, SceneAction, Sequencer};

const EPSILON: f32 = 1e-6;
const DT: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmd {
    Call(&'static str),
    /// Predicate that holds once `ready` is set.
    Ready(&'static str),
    Finally(&'static str),
}

/// Logs every command with the tick it ran on.
#[derive(Default)]
struct Recorder {
    tick: u32,
    log: Vec<(u32, Cmd)>,
    ready: Vec<&'static str>,
}

impl Recorder {
    fn ticks_of(&self, cmd: Cmd) -> Vec<u32> {
        self.log
            .iter()
            .filter(|(_, c)| *c == cmd)
            .map(|(t, _)| *t)
            .collect()
    }
}

impl Director for Recorder {
    type Command = Cmd;

    fn execute(&mut self, command: &Cmd) -> bool {
        self.log.push((self.tick, *command));
        match command {
            Cmd::Ready(name) => self.ready.contains(name),
            Cmd::Call(_) | Cmd::Finally(_) => true,
        }
    }
}

fn run_scene_until_finished(scene: &mut Scene<Cmd>, director: &mut Recorder, limit: u32) -> u32 {
    while director.tick < limit {
        director.tick += 1;
        scene.update(director, DT);
        if scene.is_finished() {
            return director.tick;
        }
    }
    panic!("scene did not finish within {limit} ticks");
}

#[test]
fn scene_delays_gate_call_and_finish() {
    let mut director = Recorder {
        ready: vec!["g"],
        ..Default::default()
    };
    let mut scene = Scene::new(
        "S",
        vec![
            SceneAction::new(Cmd::Call("f"))
                .until(Cmd::Ready("g"))
                .finally(Cmd::Finally("f")),
        ],
    )
    .with_pre_delay(0.5)
    .with_post_delay(0.25);

    let finished = run_scene_until_finished(&mut scene, &mut director, 120);

    assert_eq!(director.ticks_of(Cmd::Call("f")), vec![31]);
    assert_eq!(director.ticks_of(Cmd::Finally("f")), vec![31]);
    assert_eq!(finished, 46);
    assert!(approx_eq(scene.pre_delay().max(0.0), 0.0));
}

#[test]
fn action_is_called_once_while_predicate_polls() {
    let mut director = Recorder::default();
    let mut scene = Scene::new(
        "wait",
        vec![SceneAction::new(Cmd::Call("walk")).until(Cmd::Ready("arrived"))],
    );
    for _ in 0..5 {
        director.tick += 1;
        scene.update(&mut director, DT);
    }
    assert_eq!(director.ticks_of(Cmd::Call("walk")), vec![1]);
    assert_eq!(director.ticks_of(Cmd::Ready("arrived")).len(), 5);
    assert!(!scene.is_finalized());

    director.ready.push("arrived");
    director.tick += 1;
    scene.update(&mut director, DT);
    assert!(scene.is_finished());
    assert_eq!(director.ticks_of(Cmd::Call("walk")), vec![1]);
}

#[test]
fn finalizers_run_together_after_the_slowest_action() {
    let mut director = Recorder::default();
    let mut scene = Scene::new(
        "pair",
        vec![
            SceneAction::new(Cmd::Call("quick")).finally(Cmd::Finally("quick")),
            SceneAction::new(Cmd::Call("slow"))
                .until(Cmd::Ready("slow"))
                .finally(Cmd::Finally("slow")),
        ],
    );
    director.tick = 1;
    scene.update(&mut director, DT);
    assert!(director.ticks_of(Cmd::Finally("quick")).is_empty());

    director.ready.push("slow");
    director.tick = 2;
    scene.update(&mut director, DT);
    assert_eq!(director.ticks_of(Cmd::Finally("quick")), vec![2]);
    assert_eq!(director.ticks_of(Cmd::Finally("slow")), vec![2]);
}

#[test]
fn only_one_scene_advances_at_a_time() {
    let mut director = Recorder::default();
    let mut sequencer = Sequencer::new(vec![
        Scene::new(
            "first",
            vec![SceneAction::new(Cmd::Call("first")).until(Cmd::Ready("first"))],
        ),
        Scene::new("second", vec![SceneAction::new(Cmd::Call("second"))]),
        Scene::new("third", vec![SceneAction::new(Cmd::Call("third"))]).with_pre_delay(0.1),
    ]);

    for _ in 0..3 {
        director.tick += 1;
        sequencer.update(&mut director, DT);
        assert_eq!(sequencer.current_index(), Some(0));
        assert!(sequencer.scenes()[1..].iter().all(|s| !s.is_finalized()));
    }
    assert!(director.ticks_of(Cmd::Call("second")).is_empty());

    director.ready.push("first");
    director.tick += 1;
    sequencer.update(&mut director, DT);
    assert_eq!(sequencer.current_index(), Some(1));

    director.tick += 1;
    sequencer.update(&mut director, DT);
    assert_eq!(director.ticks_of(Cmd::Call("second")), vec![5]);
    assert_eq!(sequencer.current_index(), Some(2));
    assert!(director.ticks_of(Cmd::Call("third")).is_empty());
}

#[test]
fn sequencer_finishes_on_the_tick_of_the_last_action() {
    let mut director = Recorder::default();
    let mut sequencer = Sequencer::new(vec![
        Scene::new("empty", vec![]),
        Scene::new(
            "last",
            vec![SceneAction::new(Cmd::Call("last")).until(Cmd::Ready("last"))],
        ),
    ]);
    director.tick = 1;
    sequencer.update(&mut director, DT);
    assert_eq!(sequencer.current_index(), Some(1));

    director.tick = 2;
    sequencer.update(&mut director, DT);
    assert!(!sequencer.is_finished());

    director.ready.push("last");
    director.tick = 3;
    sequencer.update(&mut director, DT);
    assert!(sequencer.is_finished());
}
