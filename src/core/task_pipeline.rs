// src/core/task_pipeline.rs

use anyhow::Result;
use colored::*;
use std::fmt;

type TaskFn<'a, C> = Box<dyn FnMut(&mut C) -> Result<()> + 'a>;
type SkipFn<'a, C> = Box<dyn Fn(&C) -> bool + 'a>;

/// One named unit of work operating on the pipeline's shared context.
pub struct Step<'a, C> {
    title: String,
    task: TaskFn<'a, C>,
    skip: Option<SkipFn<'a, C>>,
    enabled: bool,
}

impl<'a, C> Step<'a, C> {
    pub fn new(title: impl Into<String>, task: impl FnMut(&mut C) -> Result<()> + 'a) -> Self {
        Self {
            title: title.into(),
            task: Box::new(task),
            skip: None,
            enabled: true,
        }
    }

    /// Skips the step when `predicate` holds, evaluated right before the step would run.
    pub fn skip_if(mut self, predicate: impl Fn(&C) -> bool + 'a) -> Self {
        self.skip = Some(Box::new(predicate));
        self
    }

    /// Decided once, when the pipeline is assembled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<C> fmt::Debug for Step<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("title", &self.title)
            .field("enabled", &self.enabled)
            .field("has_skip", &self.skip.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
    Skipped,
    Disabled,
    /// An earlier failure stopped a pipeline running with `exit_on_error`.
    NotRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub title: String,
    pub outcome: StepOutcome,
}

/// The final context plus what happened to each step, in declaration order.
#[derive(Debug)]
pub struct PipelineRun<C> {
    pub context: C,
    pub steps: Vec<StepReport>,
}

impl<C> PipelineRun<C> {
    /// Messages of the failed steps, in declaration order.
    pub fn failures(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| match &s.outcome {
            StepOutcome::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Runs steps strictly in order against one mutable context.
///
/// With `exit_on_error(false)` a failing step is recorded and the next one still runs,
/// so a single pass collects every problem. The context is always handed back.
pub struct TaskPipeline<'a, C> {
    steps: Vec<Step<'a, C>>,
    exit_on_error: bool,
    render: bool,
}

impl<C> fmt::Debug for TaskPipeline<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskPipeline")
            .field("steps", &self.steps)
            .field("exit_on_error", &self.exit_on_error)
            .field("render", &self.render)
            .finish()
    }
}

impl<C> Default for TaskPipeline<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, C> TaskPipeline<'a, C> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            exit_on_error: true,
            render: true,
        }
    }

    pub fn exit_on_error(mut self, exit_on_error: bool) -> Self {
        self.exit_on_error = exit_on_error;
        self
    }

    /// Whether to print a status line per step.
    pub fn render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn step(mut self, step: Step<'a, C>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn run(self, mut context: C) -> PipelineRun<C> {
        let render = self.render;
        let exit_on_error = self.exit_on_error;
        let mut reports = Vec::with_capacity(self.steps.len());
        let mut halted = false;

        for mut step in self.steps {
            let outcome = if halted {
                StepOutcome::NotRun
            } else if !step.enabled {
                StepOutcome::Disabled
            } else if step.skip.as_ref().is_some_and(|skip| skip(&context)) {
                StepOutcome::Skipped
            } else {
                log::debug!("Running step '{}'", step.title);
                match (step.task)(&mut context) {
                    Ok(()) => StepOutcome::Succeeded,
                    Err(e) => {
                        log::warn!("Step '{}' failed: {:?}", step.title, e);
                        halted = exit_on_error;
                        StepOutcome::Failed(format!("{:#}", e))
                    }
                }
            };

            if render {
                render_outcome(&step.title, &outcome);
            }
            reports.push(StepReport {
                title: step.title,
                outcome,
            });
        }

        PipelineRun {
            context,
            steps: reports,
        }
    }
}

fn render_outcome(title: &str, outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Succeeded => println!("{} {}", "✔".green(), title),
        StepOutcome::Failed(message) => {
            println!("{} {}", "✖".red(), title.red());
            println!("  {} {}", "└─".dimmed(), message.red());
        }
        StepOutcome::Skipped => println!("{} {}", "↓".dimmed(), format!("{} [skipped]", title).dimmed()),
        StepOutcome::Disabled | StepOutcome::NotRun => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Debug, Default)]
    struct Ctx {
        first: bool,
        third: bool,
        visits: Vec<&'static str>,
    }

    #[test]
    fn test_failure_does_not_stop_later_steps() {
        let run = TaskPipeline::new()
            .exit_on_error(false)
            .render(false)
            .step(Step::new("first", |c: &mut Ctx| {
                c.first = true;
                Ok(())
            }))
            .step(Step::new("second", |_: &mut Ctx| Err(anyhow!("boom"))))
            .step(Step::new("third", |c: &mut Ctx| {
                c.third = true;
                Ok(())
            }))
            .run(Ctx::default());

        assert!(run.context.first);
        assert!(run.context.third);
        assert_eq!(run.steps[1].outcome, StepOutcome::Failed("boom".to_string()));
        assert_eq!(run.steps[2].outcome, StepOutcome::Succeeded);
        assert_eq!(run.failures().collect::<Vec<_>>(), vec!["boom"]);
    }

    #[test]
    fn test_exit_on_error_marks_rest_not_run() {
        let run = TaskPipeline::new()
            .render(false)
            .step(Step::new("fails", |_: &mut Ctx| Err(anyhow!("nope"))))
            .step(Step::new("never", |c: &mut Ctx| {
                c.third = true;
                Ok(())
            }))
            .run(Ctx::default());

        assert!(!run.context.third);
        assert_eq!(run.steps[1].outcome, StepOutcome::NotRun);
        assert_eq!(run.failures().collect::<Vec<_>>(), vec!["nope"]);
    }

    #[test]
    fn test_skip_sees_earlier_results_and_disabled_never_runs() {
        let run = TaskPipeline::new()
            .exit_on_error(false)
            .render(false)
            .step(Step::new("set", |c: &mut Ctx| {
                c.first = true;
                c.visits.push("set");
                Ok(())
            }))
            .step(
                Step::new("skipped", |c: &mut Ctx| {
                    c.visits.push("skipped");
                    Ok(())
                })
                .skip_if(|c| c.first),
            )
            .step(
                Step::new("disabled", |c: &mut Ctx| {
                    c.visits.push("disabled");
                    Ok(())
                })
                .enabled(false),
            )
            .step(
                Step::new("runs", |c: &mut Ctx| {
                    c.visits.push("runs");
                    Ok(())
                })
                .skip_if(|c| !c.first),
            )
            .run(Ctx::default());

        assert_eq!(run.context.visits, vec!["set", "runs"]);
        let outcomes: Vec<_> = run.steps.iter().map(|s| s.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                StepOutcome::Succeeded,
                StepOutcome::Skipped,
                StepOutcome::Disabled,
                StepOutcome::Succeeded
            ]
        );
        assert_eq!(run.failures().count(), 0);
    }

    #[test]
    fn test_failure_message_includes_context_chain() {
        let run = TaskPipeline::new()
            .render(false)
            .step(Step::new("ctx", |_: &mut Ctx| {
                Err(anyhow!("root cause")).map_err(|e| e.context("outer"))
            }))
            .run(Ctx::default());
        assert_eq!(
            run.steps[0].outcome,
            StepOutcome::Failed("outer: root cause".to_string())
        );
    }
}
