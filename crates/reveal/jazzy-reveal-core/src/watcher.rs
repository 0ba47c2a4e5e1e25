//! Mutation watcher: turns `childList` records into newly eligible elements.

use crate::host::{is_eligible, AddedNode, Host, MutationRecord};

#[derive(Debug, Default)]
pub struct MutationWatcher {
    installed: bool,
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start document-wide `childList` + `subtree` observation.
    pub fn install<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.installed {
            host.watch_mutations();
            self.installed = true;
        }
    }

    pub fn uninstall<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.installed {
            host.unwatch_mutations();
            self.installed = false;
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Eligible elements among the added nodes of `records`: each added element
    /// itself, then its eligible descendants. Non-element nodes are skipped.
    /// The result may contain duplicates when records overlap; registration
    /// ignores elements that are already tracked.
    pub fn collect<H: Host + ?Sized>(
        &self,
        host: &H,
        records: &[MutationRecord<H::Element>],
    ) -> Vec<H::Element> {
        let mut found = Vec::new();
        if !self.installed {
            return found;
        }
        for record in records {
            for node in &record.added_nodes {
                let AddedNode::Element(element) = node else {
                    continue;
                };
                if is_eligible(host, element) {
                    found.push(element.clone());
                }
                found.extend(host.query_eligible(Some(element)));
            }
        }
        found
    }
}
