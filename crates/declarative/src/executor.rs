//! Execution engine - reconciles a plan entry by entry in dependency order

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::error::{Error, Result};
use crate::planner::{ExecutionPlan, ManifestEntry};
use crate::reconciler;
use crate::schema::{Validated, validate};
use crate::types::{EntryReport, ExecuteOptions, ExecuteSummary, Outcome, Plan};
use sasekit::Session;

/// An ordered entry that passed validation
struct Step<'a> {
    entry: &'a ManifestEntry,
    validated: Validated<'a>,
}

impl Step<'_> {
    fn plan(&self, session: &dyn Session) -> Result<Plan> {
        reconciler::plan(session, &self.validated, self.entry.ensure)
    }

    fn report(&self, plan: &Plan, outcome: Option<Outcome>) -> EntryReport {
        EntryReport {
            kind: self.validated.kind(),
            folder: self.validated.folder(),
            name: self.validated.name().to_string(),
            action: plan.action(),
            outcome,
        }
    }
}

/// Execute a plan against a session
///
/// Every entry is validated and the plan's references are checked before
/// the first remote call. Entries then run strictly one at a time in
/// [`ExecutionPlan::ordered`] order, and the first failure halts the run.
/// Nothing is rolled back.
///
/// # Type Parameters
/// * `P` - Progress callback type
/// * `C` - Confirm callback type
///
/// # Returns
/// Summary of execution results
pub fn execute<P, C>(
    plan: &ExecutionPlan,
    session: &dyn Session,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let steps = prepare(plan)?;

    // Preview every entry to count changes
    let previews = steps
        .iter()
        .map(|step| step.plan(session))
        .collect::<Result<Vec<_>>>()?;
    let total_changes = previews.iter().filter(|p| p.is_change()).count();

    if opts.dry_run {
        let mut summary = ExecuteSummary::default();
        for (step, preview) in steps.iter().zip(&previews) {
            summary.add(step.report(preview, None));
        }
        return Ok(summary);
    }

    if total_changes == 0 {
        // No-op plans never touch the session
        let mut summary = ExecuteSummary::default();
        for (step, preview) in steps.iter().zip(previews) {
            let outcome = reconciler::apply(session, &step.validated, preview.clone())?;
            summary.add(step.report(&preview, Some(outcome)));
        }
        return Ok(summary);
    }

    let prompt = format!("Apply {total_changes} change(s)?");
    if !confirm.confirm(&prompt).map_err(Error::Confirm)? {
        return Ok(ExecuteSummary {
            skipped: total_changes,
            ..Default::default()
        });
    }

    progress.on_start(steps.len());
    let result = apply_steps(&steps, session, progress);
    progress.on_finish();
    result
}

/// Execute without progress reporting or confirmation
pub fn execute_simple(
    plan: &ExecutionPlan,
    session: &dyn Session,
    opts: &ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(plan, session, opts, &mut NoProgress, &mut AutoConfirm)
}

/// Validate and order every entry without touching the network
///
/// This is everything `execute` checks before its first remote call.
pub fn check(plan: &ExecutionPlan) -> Result<usize> {
    prepare(plan).map(|steps| steps.len())
}

fn prepare(plan: &ExecutionPlan) -> Result<Vec<Step<'_>>> {
    let mut steps = Vec::with_capacity(plan.len());
    for entry in plan.ordered() {
        let validated = validate(entry.folder, &entry.descriptor)?;
        steps.push(Step { entry, validated });
    }
    plan.check_references()?;
    Ok(steps)
}

/// Reconcile each entry afresh, halting on the first error
fn apply_steps<P: ProgressCallback>(
    steps: &[Step<'_>],
    session: &dyn Session,
    progress: &mut P,
) -> Result<ExecuteSummary> {
    let mut summary = ExecuteSummary::default();

    for step in steps {
        let label = step.entry.label();
        progress.on_entry_start(&label);

        let plan = step.plan(session)?;
        let outcome = reconciler::apply(session, &step.validated, plan.clone())?;

        progress.on_entry_complete(&label, plan.action());
        summary.add(step.report(&plan, Some(outcome)));
    }

    Ok(summary)
}
