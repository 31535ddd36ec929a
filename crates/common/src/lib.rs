pub mod env;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        assert_eq!(serde_json::to_value(&h).unwrap(), serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn message_serializes_flat() {
        let m = types::Message::new("Automation started");
        assert_eq!(serde_json::to_value(&m).unwrap(), serde_json::json!({"message": "Automation started"}));
    }
}
