//! Workstation model.
//!
//! A station holds an ordered task sequence. Its total time and tool
//! counts are maintained incrementally, so the fields are private and
//! only changed through [`Station::push_task`] and [`Station::remove_task`].

use std::collections::BTreeMap;

use super::Task;

/// An ordered workstation.
///
/// Task order is execution order and matters for intra-station precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: usize,
    tasks: Vec<Task>,
    total_time: i64,
    tools: BTreeMap<String, usize>,
}

impl Station {
    /// Creates an empty station with the given 1-based id.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            tasks: Vec::new(),
            total_time: 0,
            tools: BTreeMap::new(),
        }
    }

    /// Creates a station from a task sequence.
    pub fn with_tasks(id: usize, tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut station = Self::new(id);
        for task in tasks {
            station.push_task(task);
        }
        station
    }

    /// Station id (1-based line position).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Assigned tasks in execution order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Sum of assigned processing times.
    pub fn total_time(&self) -> i64 {
        self.total_time
    }

    /// Tool key → number of assigned tasks using it.
    pub fn tools(&self) -> &BTreeMap<String, usize> {
        &self.tools
    }

    /// Number of assigned tasks using the given tool key.
    pub fn tool_count(&self, tool_key: &str) -> usize {
        self.tools.get(tool_key).copied().unwrap_or(0)
    }

    /// Number of distinct tool categories (`"none"` included).
    pub fn distinct_tools(&self) -> usize {
        self.tools.len()
    }

    /// Appends a task, updating total time and tool counts.
    pub fn push_task(&mut self, task: Task) {
        self.total_time += task.processing_time;
        *self.tools.entry(task.tool_key().to_string()).or_insert(0) += 1;
        self.tasks.push(task);
    }

    /// Removes the first task with the given id, keeping totals consistent.
    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let pos = self.position_of(task_id)?;
        let task = self.tasks.remove(pos);
        self.total_time -= task.processing_time;
        if let Some(count) = self.tools.get_mut(task.tool_key()) {
            *count -= 1;
            if *count == 0 {
                self.tools.remove(task.tool_key());
            }
        }
        Some(task)
    }

    /// Position of a task within the station sequence.
    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Whether the station holds the given task.
    pub fn contains(&self, task_id: &str) -> bool {
        self.position_of(task_id).is_some()
    }

    /// Task ids in execution order.
    pub fn task_ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    /// Whether no task is assigned.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of assigned tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Unused time against the given takt time (negative when overloaded).
    pub fn idle_time(&self, takt_time: i64) -> i64 {
        takt_time - self.total_time
    }
}
