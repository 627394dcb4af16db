//! Turns one line of player input into a command call or a movement attempt.
//!
//! ```text
//!  raw input ──► split ──► registry hit ──► handler(args, actor)
//!                              │
//!                              └─ miss ──► exit matcher ──► movement
//! ```
//!
//! Every failure on this path is soft: the player is told, nothing is
//! mutated, and the session carries on. Handler errors and panics are caught
//! here so one broken command cannot take other sessions down with it.

use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, error, warn};

use crate::logutil::escape_log;
use crate::metrics;
use crate::mud::commands;
use crate::mud::context::GameContext;
use crate::mud::errors::MudError;
use crate::mud::messages::Message;
use crate::mud::movement;
use crate::mud::output::Output;
use crate::mud::registry::{CommandOutcome, CommandRegistry, Handler};
use crate::mud::types::PlayerRecord;
use crate::mud::world::World;

/// Why an input was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NotFound,
    Ambiguous,
    BlockedByCombat,
    VoidDestination,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NotFound => "not_found",
            Rejection::Ambiguous => "ambiguous",
            Rejection::BlockedByCombat => "blocked_by_combat",
            Rejection::VoidDestination => "void_destination",
        }
    }
}

/// What a single `dispatch` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank input.
    Idle,
    Handled(CommandOutcome),
    Moved { from: String, to: String },
    Rejected(Rejection),
}

impl Dispatch {
    /// False once the player asked to leave.
    pub fn keeps_session(&self) -> bool {
        !matches!(self, Dispatch::Handled(CommandOutcome::Terminate))
    }
}

/// Everything a command handler gets to see.
pub struct Invocation<'a> {
    pub dispatcher: &'a Dispatcher,
    pub actor: &'a str,
    /// Input after the command word, left-trimmed.
    pub args: &'a str,
    pub output: Arc<dyn Output>,
    movement: Cell<Option<MoveResult>>,
}

/// Rooms left and entered, or why the move was turned down.
pub type MoveResult = Result<(String, String), Rejection>;

impl<'a> Invocation<'a> {
    pub fn ctx(&self) -> &GameContext {
        self.dispatcher.context()
    }

    pub fn world(&self) -> &World {
        &self.dispatcher.context().world
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.dispatcher.registry()
    }

    /// Current record of the acting player.
    pub fn player(&self) -> Result<PlayerRecord, MudError> {
        self.world()
            .player(self.actor)
            .ok_or_else(|| MudError::NotFound(format!("player: {}", self.actor)))
    }

    pub fn say(&self, text: &str) {
        self.output.say(text);
    }

    pub fn write(&self, text: &str) {
        self.output.write(text);
    }

    pub fn say_msg(&self, message: Message) {
        self.output.say_msg(&message);
    }

    pub fn write_msg(&self, message: Message) {
        self.output.write_msg(&message);
    }

    /// Hand a movement attempt back to the dispatcher, which then reports
    /// `Moved` or `Rejected` instead of `Handled`.
    pub fn report_move(&self, result: MoveResult) {
        self.movement.set(Some(result));
    }
}

pub struct Dispatcher {
    ctx: Arc<GameContext>,
    registry: Arc<CommandRegistry>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<GameContext>, registry: Arc<CommandRegistry>) -> Self {
        Self { ctx, registry }
    }

    /// Dispatcher over the stock command set.
    pub fn with_builtin_commands(ctx: Arc<GameContext>) -> Self {
        Self::new(ctx, Arc::new(commands::builtin_registry()))
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run one line of input for `actor`.
    pub fn dispatch(&self, raw_input: &str, actor: &str) -> Dispatch {
        let input: String = raw_input
            .chars()
            .take(self.ctx.settings.max_input_len)
            .collect();
        let input = input.trim();
        if input.is_empty() {
            return Dispatch::Idle;
        }
        metrics::inc_dispatched();
        debug!("dispatch: actor={} input={}", actor, escape_log(input));

        let Some(output) = self.ctx.world.output(actor) else {
            warn!("dispatch for offline player {}", actor);
            return self.reject(Rejection::NotFound);
        };

        let (word, args) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (input, ""),
        };

        if let Some(handler) = self.registry.lookup(word) {
            metrics::record_command(word);
            return match self.invoke(word, &handler, actor, args, output) {
                (_, Some(Ok((from, to)))) => Dispatch::Moved { from, to },
                (_, Some(Err(rejection))) => self.reject(rejection),
                (outcome, None) => Dispatch::Handled(outcome),
            };
        }

        match movement::travel(self, actor, word) {
            Ok((from, to)) => Dispatch::Moved { from, to },
            Err(Rejection::NotFound) => {
                output.say_msg(&Message::UnknownCommand(word.to_string()));
                self.reject(Rejection::NotFound)
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    /// Run the registered `look` for `actor`, or the stock one if `look` was
    /// never registered.
    pub fn force_look(&self, actor: &str) {
        let Some(output) = self.ctx.world.output(actor) else {
            return;
        };
        match self.registry.lookup("look") {
            Some(handler) => {
                self.invoke("look", &handler, actor, "", output);
            }
            None => {
                let handler: Handler = Arc::new(commands::look);
                self.invoke("look", &handler, actor, "", output);
            }
        }
    }

    fn invoke(
        &self,
        name: &str,
        handler: &Handler,
        actor: &str,
        args: &str,
        output: Arc<dyn Output>,
    ) -> (CommandOutcome, Option<MoveResult>) {
        let invocation = Invocation {
            dispatcher: self,
            actor,
            args,
            output: Arc::clone(&output),
            movement: Cell::new(None),
        };
        let outcome = match catch_unwind(AssertUnwindSafe(|| handler(&invocation))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!("command {} failed for {}: {}", name, actor, e);
                metrics::inc_handler_failures();
                output.say_msg(&Message::CommandFailed);
                CommandOutcome::Continue
            }
            Err(_) => {
                error!("command {} panicked for {}", name, actor);
                metrics::inc_handler_failures();
                output.say_msg(&Message::CommandFailed);
                CommandOutcome::Continue
            }
        };
        (outcome, invocation.movement.take())
    }

    fn reject(&self, rejection: Rejection) -> Dispatch {
        metrics::inc_rejection(rejection);
        Dispatch::Rejected(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mud::output::RecordingOutput;
    use crate::mud::types::{Exit, RoomRecord};

    fn setup() -> (Dispatcher, Arc<RecordingOutput>) {
        let world = Arc::new(World::new());
        world.insert_room(
            RoomRecord::new("square", "Town Square", "A busy square.")
                .with_exit(Exit::new("north", "market")),
        );
        world.insert_room(RoomRecord::new("market", "Market", "Stalls everywhere."));
        let out = Arc::new(RecordingOutput::new());
        world
            .add_player(PlayerRecord::new("alice", "square"), out.clone())
            .unwrap();
        let ctx = Arc::new(GameContext::new(world));
        (Dispatcher::with_builtin_commands(ctx), out)
    }

    #[test]
    fn test_blank_input_is_idle() {
        let (dispatcher, out) = setup();
        assert_eq!(dispatcher.dispatch("   ", "alice"), Dispatch::Idle);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_unknown_word_reports_not_found() {
        let (dispatcher, out) = setup();
        assert_eq!(
            dispatcher.dispatch("dance wildly", "alice"),
            Dispatch::Rejected(Rejection::NotFound)
        );
        assert_eq!(out.lines(), vec!["dance: command not found"]);
    }

    #[test]
    fn test_exit_fallback_moves() {
        let (dispatcher, _out) = setup();
        assert_eq!(
            dispatcher.dispatch("nor", "alice"),
            Dispatch::Moved {
                from: "square".into(),
                to: "market".into()
            }
        );
    }

    #[test]
    fn test_offline_actor_is_rejected() {
        let (dispatcher, _out) = setup();
        assert_eq!(
            dispatcher.dispatch("look", "nobody"),
            Dispatch::Rejected(Rejection::NotFound)
        );
    }

    #[test]
    fn test_keeps_session() {
        assert!(Dispatch::Idle.keeps_session());
        assert!(Dispatch::Rejected(Rejection::Ambiguous).keeps_session());
        assert!(Dispatch::Handled(CommandOutcome::Continue).keeps_session());
        assert!(!Dispatch::Handled(CommandOutcome::Terminate).keeps_session());
    }
}
