// View layer: the `ViewPort` the controller mutates, the `Entry` each
// cupcake renders to, and `ListView`, an in-memory list container that the
// terminal front end draws from.

use crate::model::{Cupcake, CupcakeId};
use crossterm::style::Stylize;

/// The list container. The controller only ever clears it, appends to it
/// or removes one entry from it.
pub trait ViewPort {
    fn clear(&mut self);
    fn append(&mut self, entry: Entry);
    /// Remove the entry tagged `id`. Returns false when no entry carries it.
    fn remove(&mut self, id: CupcakeId) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Navigates to the edit page for the entry's cupcake.
    UpdateLink { href: String },
    DeleteButton,
}

/// Rendered form of one cupcake. `id` is the correlation attribute that
/// delete and update actions read back.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: CupcakeId,
    pub label: String,
    pub controls: Vec<Control>,
}

impl Entry {
    pub fn from_cupcake(cupcake: &Cupcake) -> Self {
        Entry {
            id: cupcake.id,
            label: cupcake.flavor.clone(),
            controls: vec![
                Control::UpdateLink {
                    href: edit_href(cupcake.id),
                },
                Control::DeleteButton,
            ],
        }
    }

    pub fn update_href(&self) -> Option<&str> {
        self.controls.iter().find_map(|c| match c {
            Control::UpdateLink { href } => Some(href.as_str()),
            Control::DeleteButton => None,
        })
    }

    pub fn has_delete_control(&self) -> bool {
        self.controls.contains(&Control::DeleteButton)
    }

    /// One terminal line: label, then the update link and delete control.
    pub fn render_line(&self) -> String {
        let mut line = format!("{} {}", format!("[{}]", self.id).dark_grey(), self.label.clone().bold());
        if let Some(href) = self.update_href() {
            line.push_str(&format!("  {}", format!("Update {}", href).blue()));
        }
        if self.has_delete_control() {
            line.push_str(&format!("  {}", "Delete".red()));
        }
        line
    }
}

pub fn edit_href(id: CupcakeId) -> String {
    format!("/edit-cupcake/{}", id)
}

/// Ordered list of rendered entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    entries: Vec<Entry>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<CupcakeId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn find(&self, id: CupcakeId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return format!("{}", "(no cupcakes)".dark_grey());
        }
        self.entries
            .iter()
            .map(Entry::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ViewPort for ListView {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn append(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    fn remove(&mut self, id: CupcakeId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }
}
