//! Static training plan used when every provider has failed.
//!
//! Pure string formatting: no I/O, no fallible calls. The output always
//! contains the marker `Training Plan Template`.

use std::fmt::Write;

use crate::training::generator::TrainingPlanRequest;

pub const TEMPLATE_MARKER: &str = "Training Plan Template";

pub fn render_template(request: &TrainingPlanRequest) -> String {
    let title = request.title.trim();
    let title = if title.is_empty() { "Untitled Program" } else { title };

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# {TEMPLATE_MARKER}: {title}\n");
    let _ = writeln!(
        out,
        "> This plan was generated from a standard template. Adjust each section to your team.\n"
    );
    let _ = writeln!(
        out,
        "**Duration:** {}  ",
        request.duration.as_deref().unwrap_or("To be determined")
    );
    let _ = writeln!(
        out,
        "**Audience:** {}  ",
        request.audience.as_deref().unwrap_or("All participants")
    );
    let _ = writeln!(
        out,
        "**Level:** {}\n",
        request.level.as_deref().unwrap_or("Beginner")
    );

    let _ = writeln!(out, "## Learning Objectives\n");
    let objectives: Vec<&str> = request
        .objectives
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();
    if objectives.is_empty() {
        let _ = writeln!(out, "1. Define the learning objectives for this program.\n");
    } else {
        for (i, objective) in objectives.iter().enumerate() {
            let _ = writeln!(out, "{}. {objective}", i + 1);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Modules\n");
    let _ = writeln!(out, "### Module 1: Orientation");
    let _ = writeln!(out, "- Introduce the program goals and schedule");
    let _ = writeln!(out, "- Baseline self-assessment\n");
    for (i, objective) in objectives.iter().enumerate() {
        let _ = writeln!(out, "### Module {}: {objective}", i + 2);
        let _ = writeln!(out, "- Key concepts and worked examples");
        let _ = writeln!(out, "- Hands-on exercise");
        let _ = writeln!(out, "- Knowledge check\n");
    }
    let _ = writeln!(out, "### Module {}: Review and Next Steps", objectives.len() + 2);
    let _ = writeln!(out, "- Recap of all objectives");
    let _ = writeln!(out, "- Individual development goals\n");

    let _ = writeln!(out, "## Assessment\n");
    let _ = writeln!(out, "- Pre- and post-program self-assessment");
    let _ = writeln!(out, "- Practical exercise reviewed by a facilitator");
    let _ = writeln!(out, "- Participant feedback survey\n");

    let _ = writeln!(out, "## Resources\n");
    let _ = write!(out, "- Add internal documentation, courses, and reading material here.");

    out
}
