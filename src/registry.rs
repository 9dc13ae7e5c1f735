//! Connector registry - the built-in connectors this host can run.

use crate::connector::Connector;
use crate::connectors::reddit::RedditConnector;
use std::sync::Arc;

/// Returns all available connectors.
pub fn get_all_connectors() -> Vec<Arc<dyn Connector>> {
    vec![Arc::new(RedditConnector::new())]
}

/// Finds a connector by its descriptor id.
pub fn find_connector(id: &str) -> Option<Arc<dyn Connector>> {
    get_all_connectors()
        .into_iter()
        .find(|c| c.descriptor().id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_reddit() {
        let connectors = get_all_connectors();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].descriptor().id, "reddit_oauth_only");
    }

    #[test]
    fn test_find_connector() {
        assert!(find_connector("reddit_oauth_only").is_some());
        assert!(find_connector("unknown").is_none());
    }
}
