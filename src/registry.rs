use std::collections::HashMap;

use serenity::all::{CommandInteraction, Context, CreateCommand};
use serenity::async_trait;

use crate::models::{Data, Error};

/// A slash-command handler
///
/// Implementations are registered once at startup and dispatched by exact
/// name match; the registry is never mutated afterwards.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// Name the command is invoked under
    fn name(&self) -> &'static str;

    /// Definition uploaded during command synchronization
    fn definition(&self) -> CreateCommand;

    async fn run(
        &self,
        ctx: &Context,
        data: &Data,
        interaction: &CommandInteraction,
    ) -> Result<(), Error>;
}

/// A context-menu handler (user or message menus)
#[async_trait]
pub trait ContextMenu: Send + Sync {
    /// Label the menu entry is shown under
    fn name(&self) -> &'static str;

    /// Definition uploaded during command synchronization
    fn definition(&self) -> CreateCommand;

    async fn run(
        &self,
        ctx: &Context,
        data: &Data,
        interaction: &CommandInteraction,
    ) -> Result<(), Error>;
}

/// Index command handlers by name for dispatch
pub fn index_commands(
    commands: Vec<Box<dyn SlashCommand>>,
) -> HashMap<&'static str, Box<dyn SlashCommand>> {
    commands.into_iter().map(|c| (c.name(), c)).collect()
}

/// Index menu handlers by name for dispatch
pub fn index_menus(
    menus: Vec<Box<dyn ContextMenu>>,
) -> HashMap<&'static str, Box<dyn ContextMenu>> {
    menus.into_iter().map(|m| (m.name(), m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub(&'static str);

    #[async_trait]
    impl SlashCommand for Stub {
        fn name(&self) -> &'static str {
            self.0
        }

        fn definition(&self) -> CreateCommand {
            CreateCommand::new(self.0)
        }

        async fn run(
            &self,
            _ctx: &Context,
            _data: &Data,
            _interaction: &CommandInteraction,
        ) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn commands_index_by_exact_name() {
        let registry = index_commands(vec![Box::new(Stub("practice")), Box::new(Stub("gostudy"))]);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("practice").unwrap().name(), "practice");
        assert!(registry.get("Practice").is_none());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn later_registration_wins_on_duplicate_name() {
        let registry = index_commands(vec![Box::new(Stub("practice")), Box::new(Stub("practice"))]);

        assert_eq!(registry.len(), 1);
    }
}
