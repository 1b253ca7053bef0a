use crate::catalog::ServiceOption;
use crate::error::{QuoteError, Result};
use crate::form::extras::{ExtraFields, ExtraTotals};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on concurrent service blocks
pub const MAX_SERVICE_BLOCKS: usize = 3;

/// Stable identifier of a service block; never reused after removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One service dropdown plus its conditional inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBlock {
    id: BlockId,
    options: Vec<ServiceOption>,
    selected: Option<String>,
    extras: ExtraFields,
}

impl ServiceBlock {
    fn new(id: BlockId, options: Vec<ServiceOption>) -> Self {
        let selected = options.first().map(|o| o.key.clone());
        let extras = ExtraFields::for_service(selected.as_deref());
        Self {
            id,
            options,
            selected,
            extras,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn options(&self) -> &[ServiceOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn extras(&self) -> &ExtraFields {
        &self.extras
    }

    pub fn extras_mut(&mut self) -> &mut ExtraFields {
        &mut self.extras
    }

    pub fn offers(&self, service_key: &str) -> bool {
        self.options.iter().any(|o| o.key == service_key)
    }

    /// Select an offered service; switching to a different key resets the extras
    pub(crate) fn select(&mut self, service_key: &str) -> bool {
        if !self.offers(service_key) {
            return false;
        }
        self.set_selection(Some(service_key.to_string()));
        true
    }

    /// Replace the option set, keeping the selection when it is still offered
    pub(crate) fn repopulate(&mut self, options: Vec<ServiceOption>) {
        let keep = self
            .selected
            .as_deref()
            .filter(|key| options.iter().any(|o| o.key == *key))
            .map(str::to_string);
        let next = keep.or_else(|| options.first().map(|o| o.key.clone()));

        self.options = options;
        self.set_selection(next);
    }

    fn set_selection(&mut self, next: Option<String>) {
        if self.selected != next {
            self.extras = ExtraFields::for_service(next.as_deref());
            self.selected = next;
        }
    }
}

/// Result of an add request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(BlockId),
    /// Bound reached; the limit message is now showing
    LimitReached,
}

/// Ordered list of service blocks, always holding between 1 and `max` entries
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBlockList {
    blocks: Vec<ServiceBlock>,
    next_id: u32,
    max: usize,
    limit_message_visible: bool,
}

impl ServiceBlockList {
    /// Create the list with its first block
    ///
    /// `max` is clamped to `1..=MAX_SERVICE_BLOCKS`.
    pub fn new(options: Vec<ServiceOption>, max: usize) -> Self {
        let max = max.clamp(1, MAX_SERVICE_BLOCKS);
        let mut list = Self {
            blocks: Vec::with_capacity(max),
            next_id: 0,
            max,
            limit_message_visible: false,
        };
        let id = list.allocate_id();
        list.blocks.push(ServiceBlock::new(id, options));
        list
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a block populated with `options` unless the bound is reached
    pub fn add(&mut self, options: Vec<ServiceOption>) -> AddOutcome {
        if self.blocks.len() >= self.max {
            self.limit_message_visible = true;
            return AddOutcome::LimitReached;
        }

        let id = self.allocate_id();
        self.blocks.push(ServiceBlock::new(id, options));
        self.limit_message_visible = false;
        AddOutcome::Added(id)
    }

    /// Remove a non-first block
    pub fn remove(&mut self, id: BlockId) -> Result<()> {
        let position = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(QuoteError::BlockNotFound(id.0))?;

        if position == 0 {
            return Err(QuoteError::CannotRemoveFirstBlock);
        }

        self.blocks.remove(position);
        if self.blocks.len() < self.max {
            self.limit_message_visible = false;
        }
        Ok(())
    }

    /// Give every block the option set of a new tow type
    pub fn repopulate(&mut self, options: &[ServiceOption]) {
        for block in &mut self.blocks {
            block.repopulate(options.to_vec());
        }
    }

    pub fn get(&self, id: BlockId) -> Option<&ServiceBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut ServiceBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn first(&self) -> &ServiceBlock {
        &self.blocks[0]
    }

    pub(crate) fn first_mut(&mut self) -> &mut ServiceBlock {
        &mut self.blocks[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Only the newest block shows an enabled add button
    pub fn can_add_from(&self, id: BlockId) -> bool {
        self.blocks.last().is_some_and(|b| b.id == id)
    }

    /// Every block except the first shows a remove button
    pub fn can_remove(&self, id: BlockId) -> bool {
        self.blocks.iter().skip(1).any(|b| b.id == id)
    }

    pub fn limit_message_visible(&self) -> bool {
        self.limit_message_visible
    }

    /// Selected service keys in block order, skipping blank blocks
    pub fn selected_services(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter_map(|b| b.selected().map(str::to_string))
            .collect()
    }

    /// Sum of all blocks' extra inputs
    pub fn totals(&self) -> ExtraTotals {
        let mut totals = ExtraTotals::default();
        for block in &self.blocks {
            totals += block.extras().totals();
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::extras::{SIDE_WINDOW, WINDOW_FILM};

    fn opts(keys: &[&str]) -> Vec<ServiceOption> {
        keys.iter()
            .map(|k| ServiceOption {
                key: k.to_string(),
                label: k.to_uppercase(),
            })
            .collect()
    }

    #[test]
    fn test_new_list_has_one_block_with_first_option() {
        let list = ServiceBlockList::new(opts(&["tow", "winch"]), MAX_SERVICE_BLOCKS);
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().selected(), Some("tow"));
        assert!(!list.limit_message_visible());
    }

    #[test]
    fn test_bound_is_clamped() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), 10);
        assert_eq!(list.max(), MAX_SERVICE_BLOCKS);
        for _ in 0..5 {
            list.add(opts(&["tow"]));
        }
        assert_eq!(list.len(), MAX_SERVICE_BLOCKS);
        assert!(list.limit_message_visible());

        let list = ServiceBlockList::new(opts(&["tow"]), 0);
        assert_eq!(list.max(), 1);
    }

    #[test]
    fn test_add_is_bounded() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);

        assert_eq!(list.add(opts(&["tow"])), AddOutcome::Added(BlockId(1)));
        assert_eq!(list.add(opts(&["tow"])), AddOutcome::Added(BlockId(2)));
        assert!(!list.limit_message_visible());

        assert_eq!(list.add(opts(&["tow"])), AddOutcome::LimitReached);
        assert_eq!(list.len(), 3);
        assert!(list.limit_message_visible());
    }

    #[test]
    fn test_remove_hides_limit_message() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);
        list.add(opts(&["tow"]));
        list.add(opts(&["tow"]));
        list.add(opts(&["tow"]));
        assert!(list.limit_message_visible());

        list.remove(BlockId(1)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list.limit_message_visible());
    }

    #[test]
    fn test_first_block_cannot_be_removed() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);
        assert!(matches!(
            list.remove(BlockId(0)),
            Err(QuoteError::CannotRemoveFirstBlock)
        ));
        assert!(matches!(
            list.remove(BlockId(7)),
            Err(QuoteError::BlockNotFound(7))
        ));
        assert!(!list.can_remove(BlockId(0)));
    }

    #[test]
    fn test_add_affordance_follows_last_block() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);
        assert!(list.can_add_from(BlockId(0)));

        list.add(opts(&["tow"]));
        list.add(opts(&["tow"]));
        assert!(!list.can_add_from(BlockId(0)));
        assert!(!list.can_add_from(BlockId(1)));
        assert!(list.can_add_from(BlockId(2)));

        list.remove(BlockId(2)).unwrap();
        assert!(list.can_add_from(BlockId(1)));

        // ids are never reused
        assert_eq!(list.add(opts(&["tow"])), AddOutcome::Added(BlockId(3)));
    }

    #[test]
    fn test_repopulate_keeps_valid_selection() {
        let mut list = ServiceBlockList::new(opts(&["tow", "winch"]), MAX_SERVICE_BLOCKS);
        let id = match list.add(opts(&["tow", "winch"])) {
            AddOutcome::Added(id) => id,
            AddOutcome::LimitReached => panic!("expected a new block"),
        };
        assert!(list.get_mut(id).unwrap().select("winch"));

        list.repopulate(&opts(&["winch", "jump_start"]));

        assert_eq!(list.first().selected(), Some("winch"));
        assert_eq!(list.get(id).unwrap().selected(), Some("winch"));

        list.repopulate(&opts(&["lockout", "fuel"]));
        assert_eq!(list.first().selected(), Some("lockout"));
        assert_eq!(list.get(id).unwrap().selected(), Some("lockout"));
        assert_eq!(list.get(id).unwrap().options().len(), 2);
    }

    #[test]
    fn test_repopulate_with_empty_options_clears_selection() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);
        list.repopulate(&[]);
        assert_eq!(list.first().selected(), None);
        assert!(list.selected_services().is_empty());
    }

    #[test]
    fn test_switching_service_clears_extras() {
        let mut list = ServiceBlockList::new(opts(&["tow", WINDOW_FILM]), MAX_SERVICE_BLOCKS);
        let block = list.first_mut();
        assert!(block.select(WINDOW_FILM));
        block.extras_mut().set(SIDE_WINDOW, "4").unwrap();
        assert_eq!(list.totals().side_window, 4);

        // reselecting the same key keeps the values
        assert!(list.first_mut().select(WINDOW_FILM));
        assert_eq!(list.totals().side_window, 4);

        assert!(list.first_mut().select("tow"));
        assert!(list.first().extras().is_empty());
        assert_eq!(list.totals().side_window, 0);
    }

    #[test]
    fn test_select_rejects_unoffered_key() {
        let mut list = ServiceBlockList::new(opts(&["tow"]), MAX_SERVICE_BLOCKS);
        assert!(!list.first_mut().select("winch"));
        assert_eq!(list.first().selected(), Some("tow"));
    }
}
