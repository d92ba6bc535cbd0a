//! Command trait shared by every `gsc` subcommand.

use crate::error::Result;

/// Standard command trait every `gsc` subcommand implements, so the CLI
/// dispatches through one uniform shape regardless of which pipeline stage
/// the command stops at.
pub trait Command {
    /// The arguments type for this command.
    type Args;

    /// Creates a new command instance with the given arguments.
    fn new(args: Self::Args) -> Self;

    /// Executes the command, returning its exit code on success.
    fn execute(&self) -> Result<i32>;

    /// The command's name as it appears on the CLI.
    fn name() -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Command for Noop {
        type Args = ();

        fn new(_args: ()) -> Self {
            Noop
        }

        fn execute(&self) -> Result<i32> {
            Ok(0)
        }

        fn name() -> &'static str {
            "noop"
        }
    }

    #[test]
    fn test_command_trait_is_object_usable_through_a_concrete_impl() {
        let cmd = Noop::new(());
        assert_eq!(cmd.execute().unwrap(), 0);
        assert_eq!(Noop::name(), "noop");
    }
}
