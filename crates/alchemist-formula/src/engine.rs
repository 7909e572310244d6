//! Run a formula's spells in order.

use crate::assistant::{Assistant, DryRunAssistant};
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::live::LiveAssistant;
use crate::logbook::Logbook;
use crate::types::{Formula, Spell};

/// Execute `formula` with the assistant selected by `ctx.dry_run`.
pub fn transmute(formula: &Formula, ctx: &mut ExecutionContext) -> Result<()> {
    let log = Logbook::new(ctx.verbose);
    if ctx.dry_run {
        run_formula(formula, ctx, &mut DryRunAssistant::new(log))
    } else {
        run_formula(formula, ctx, &mut LiveAssistant::new(log))
    }
}

/// Cast every spell of `formula` against `assistant`.
///
/// The progress fields of `ctx` are reset first. When a positive step limit is
/// set, only that many spells run. The first failing spell aborts the run and
/// its error is returned unchanged.
pub fn run_formula(
    formula: &Formula,
    ctx: &mut ExecutionContext,
    assistant: &mut dyn Assistant,
) -> Result<()> {
    assistant.info(&format!("execute formula {}", formula.title));
    ctx.begin(&formula.clone_to, formula.commands.len());

    for (index, spell) in formula.commands.iter().enumerate() {
        if ctx.step_limit() == Some(index) {
            break;
        }
        ctx.set_current_spell(index + 1);
        if let Spell::InitRepo(init) = spell {
            ctx.set_clone_to(&init.clone_to);
        }
        spell.cast(assistant, ctx)?;
    }
    Ok(())
}
