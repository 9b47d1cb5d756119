use serde::{Deserialize, Serialize};

use crate::cinematic::{Director, ExecutableMethod};

/// One step of a scene.
///
/// The action fires exactly once. On that tick and every later one the
/// condition, if any, is polled; the step completes once it returns true.
/// Without a condition the step completes as soon as the action fires. The
/// finalizer is run by the owning scene once every sibling has completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAction<C> {
    action: ExecutableMethod<C>,
    condition: Option<ExecutableMethod<C>>,
    finalizer: Option<ExecutableMethod<C>>,
    completed: bool,
}

impl<C> SceneAction<C> {
    pub fn new(action: C) -> Self {
        Self {
            action: ExecutableMethod::new(action),
            condition: None,
            finalizer: None,
            completed: false,
        }
    }

    /// Complete only once `condition` holds.
    pub fn until(mut self, condition: C) -> Self {
        self.condition = Some(ExecutableMethod::new(condition));
        self
    }

    /// Run `finalizer` when the scene finishes its actions.
    pub fn finally(mut self, finalizer: C) -> Self {
        self.finalizer = Some(ExecutableMethod::new(finalizer));
        self
    }

    pub fn update<D>(&mut self, director: &mut D)
    where
        D: Director<Command = C> + ?Sized,
    {
        if self.completed {
            return;
        }
        if !self.action.has_been_called() {
            self.action.call(director);
        }
        self.completed = match self.condition.as_mut() {
            Some(condition) => condition.call(director),
            None => true,
        };
    }

    /// Run the finalizer, at most once.
    pub fn finalize<D>(&mut self, director: &mut D)
    where
        D: Director<Command = C> + ?Sized,
    {
        if let Some(finalizer) = self.finalizer.as_mut() {
            if !finalizer.has_been_called() {
                finalizer.call(director);
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn action(&self) -> &ExecutableMethod<C> {
        &self.action
    }

    pub fn finalizer(&self) -> Option<&ExecutableMethod<C>> {
        self.finalizer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Fire,
        Ready,
        Done,
    }

    #[derive(Default)]
    struct Counter {
        fired: u32,
        polls: u32,
        ready_after: u32,
        done: u32,
    }

    impl Director for Counter {
        type Command = Cmd;

        fn execute(&mut self, command: &Cmd) -> bool {
            match command {
                Cmd::Fire => self.fired += 1,
                Cmd::Ready => {
                    self.polls += 1;
                    return self.polls >= self.ready_after;
                }
                Cmd::Done => self.done += 1,
            }
            true
        }
    }

    #[test]
    fn fire_and_forget_completes_on_first_update() {
        let mut d = Counter::default();
        let mut a = SceneAction::new(Cmd::Fire);
        a.update(&mut d);
        assert!(a.is_completed());
        assert_eq!(d.fired, 1);
    }

    #[test]
    fn action_fires_once_while_condition_is_polled() {
        let mut d = Counter {
            ready_after: 3,
            ..Default::default()
        };
        let mut a = SceneAction::new(Cmd::Fire).until(Cmd::Ready);
        a.update(&mut d);
        a.update(&mut d);
        assert!(!a.is_completed());
        a.update(&mut d);
        assert!(a.is_completed());
        a.update(&mut d);
        assert_eq!(d.fired, 1);
        assert_eq!(d.polls, 3);
    }

    #[test]
    fn finalizer_runs_once() {
        let mut d = Counter::default();
        let mut a = SceneAction::new(Cmd::Fire).finally(Cmd::Done);
        a.update(&mut d);
        a.finalize(&mut d);
        a.finalize(&mut d);
        assert_eq!(d.done, 1);
        assert!(a.finalizer().is_some_and(ExecutableMethod::has_been_called));
    }
}
