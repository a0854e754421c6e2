use crate::models::Message;

/// Append-only message history. Messages are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a MessageStore {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Severity};

    #[test]
    fn test_push_preserves_order() {
        let mut store = MessageStore::new();
        assert!(store.is_empty());

        store.push(Message::user("first"));
        store.push(Message::bot("second", Severity::Info));
        let third = store.push(Message::user("third")).id();

        let contents: Vec<&str> = store.iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.last().map(|m| m.id()), Some(third));
        assert_eq!(store.messages()[1].role(), Role::Bot);
    }
}
