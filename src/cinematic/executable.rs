use serde::{Deserialize, Serialize};

use crate::cinematic::Director;

/// A command to run later, remembering whether it has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableMethod<C> {
    pub command: C,
    called: bool,
}

impl<C> ExecutableMethod<C> {
    pub fn new(command: C) -> Self {
        Self {
            command,
            called: false,
        }
    }

    /// Execute the command and mark it called.
    pub fn call<D>(&mut self, director: &mut D) -> bool
    where
        D: Director<Command = C> + ?Sized,
    {
        self.called = true;
        director.execute(&self.command)
    }

    pub fn has_been_called(&self) -> bool {
        self.called
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(Vec<u32>);

    impl Director for Echo {
        type Command = u32;

        fn execute(&mut self, command: &u32) -> bool {
            self.0.push(*command);
            *command % 2 == 0
        }
    }

    #[test]
    fn call_flips_flag_and_returns_result() {
        let mut echo = Echo(Vec::new());
        let mut m = ExecutableMethod::new(4);
        assert!(!m.has_been_called());
        assert!(m.call(&mut echo));
        assert!(m.has_been_called());
        let mut odd = ExecutableMethod::new(3);
        assert!(!odd.call(&mut echo));
        assert_eq!(echo.0, vec![4, 3]);
    }
}
