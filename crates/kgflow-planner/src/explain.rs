//! Human-readable plan rendering (EXPLAIN).

use std::fmt::Write as _;

use crate::plan::Plan;

/// Render `plan` as a fixed-width step table followed by the final columns.
pub fn render(plan: &Plan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Workflow: {}", plan.workflow);
    if let Ok(h) = plan.fingerprint() {
        let _ = writeln!(out, "Fingerprint: {}", h.short());
    }
    let _ = writeln!(
        out,
        "Steps: {} ({} enabled)",
        plan.len(),
        plan.enabled_steps().count()
    );
    let _ = writeln!(out);

    let width = plan
        .steps
        .iter()
        .map(|s| s.operation.name().len())
        .max()
        .unwrap_or(0);
    for step in &plan.steps {
        let flag = if step.enabled { "on " } else { "off" };
        let _ = write!(
            out,
            "{:>3}. [{flag}] {:<width$}  {}",
            step.id.get(),
            step.operation.name(),
            step.operation.summary(),
        );
        if let Some(input) = &step.input {
            let _ = write!(out, "  <- {input}");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Output columns: {}", plan.output_columns().join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::create_final_entities::build_plan;
    use kgflow_core::config::RunConfig;

    #[test]
    fn render_lists_every_step_and_input() {
        let text = render(&build_plan(&RunConfig::default()));
        assert!(text.starts_with("Workflow: create_final_entities"));
        assert!(text.contains("Steps: 15 (15 enabled)"));
        assert!(text.contains("<- workflow:create_base_entity_graph"));
        assert!(text.contains(" 15. [on ]"));
    }

    #[test]
    fn render_marks_disabled_steps() {
        let cfg = RunConfig {
            skip_description_embedding: Some(true),
            ..Default::default()
        };
        let text = render(&build_plan(&cfg));
        assert!(text.contains("Steps: 15 (11 enabled)"));
        assert!(text.contains(" 12. [off]"));
    }
}
