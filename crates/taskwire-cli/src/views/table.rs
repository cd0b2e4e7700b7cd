use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

use taskwire_core::models::{Task, TaskPriority, TaskStatus};
use taskwire_core::recurrence::Occurrence;

use crate::util::short_id;

pub fn display_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Priority", "Deadline", "Category"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id)));

        let mut title = String::new();
        if task.recurring || task.parent_task_id.is_some() {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(&task.title);
        if task.is_series_root() {
            title.push_str(" (series)");
        } else if let Some(index) = task.occurrence_index {
            title.push_str(&format!(" #{}", index));
        }
        if task.archived {
            title.push_str(" [archived]");
        }

        let mut title_cell = Cell::new(title);
        title_cell = match task.status {
            TaskStatus::Completed => title_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey),
            TaskStatus::Pending => match task.priority {
                TaskPriority::Urgent => {
                    title_cell.fg(Color::Red).add_attribute(Attribute::Bold)
                }
                TaskPriority::High => title_cell.fg(Color::Red),
                TaskPriority::Medium => title_cell.fg(Color::Yellow),
                TaskPriority::Low => title_cell.fg(Color::Green),
            },
        };
        row.add_cell(title_cell);

        let status_cell = match task.status {
            TaskStatus::Completed => Cell::new("completed").fg(Color::Green),
            TaskStatus::Pending => Cell::new("pending"),
        };
        row.add_cell(status_cell);
        row.add_cell(Cell::new(task.priority.to_string()));
        row.add_cell(Cell::new(humanized_deadline(task.deadline)));
        row.add_cell(Cell::new(&task.category));

        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_occurrences(occurrences: &[Occurrence]) {
    if occurrences.is_empty() {
        println!("No upcoming occurrences.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Scheduled"]);
    for occurrence in occurrences {
        table.add_row(vec![
            Cell::new(occurrence.index),
            Cell::new(format!(
                "{} ({})",
                occurrence.scheduled_at.format("%Y-%m-%d %H:%M"),
                occurrence.scheduled_at.humanize()
            )),
        ]);
    }

    println!("{table}");
}

fn humanized_deadline(deadline: Option<DateTime<Utc>>) -> String {
    match deadline {
        Some(at) => format!("{} ({})", at.format("%Y-%m-%d %H:%M"), at.humanize()),
        None => "-".to_string(),
    }
}
