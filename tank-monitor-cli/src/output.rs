use clap::ValueEnum;
use serde::Serialize;
use tank_level::ChangeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PrintFormat {
    /// One human readable line per change
    Text,

    /// One JSON object per change
    Json,
}

#[derive(Serialize)]
struct EventRecord<'a> {
    #[serde(flatten)]
    event: &'a ChangeEvent,
    fill_percentage: u8,
}

pub(crate) fn format_event(format: PrintFormat, event: &ChangeEvent) -> anyhow::Result<String> {
    match format {
        PrintFormat::Text => {
            let previous = match event.previous_level {
                Some(level) => format!("was {level}"),
                None => "was unset".to_string(),
            };
            let label = event
                .label
                .as_ref()
                .map(|l| format!("{l}, "))
                .unwrap_or_default();

            Ok(format!(
                "[{}] level {}/{} ({}{}%) {}",
                event.tank_id,
                event.new_level,
                event.probe_count,
                label,
                event.fill_percentage(),
                previous
            ))
        }
        PrintFormat::Json => Ok(serde_json::to_string(&EventRecord {
            event,
            fill_percentage: event.fill_percentage(),
        })?),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tank_level::Level;

    fn event(previous_level: Option<Level>, new_level: Level, label: Option<&str>) -> ChangeEvent {
        ChangeEvent {
            tank_id: "fresh".try_into().unwrap(),
            previous_level,
            new_level,
            probe_count: 4,
            label: label.map(|l| l.try_into().unwrap()),
        }
    }

    #[test]
    fn text_first_reading() {
        let e = event(None, Level::new(2), Some("one_third"));
        let line = format_event(PrintFormat::Text, &e).unwrap();
        assert_eq!(line, "[fresh] level 2/4 (one_third, 33%) was unset");
    }

    #[test]
    fn text_without_label() {
        let e = event(Some(Level::new(1)), Level::new(4), None);
        let line = format_event(PrintFormat::Text, &e).unwrap();
        assert_eq!(line, "[fresh] level 4/4 (100%) was 1");
    }

    #[test]
    fn json() {
        let e = event(Some(Level::new(3)), Level::new(2), Some("one_third"));
        let line = format_event(PrintFormat::Json, &e).unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tank_id": "fresh",
                "previous_level": 3,
                "new_level": 2,
                "probe_count": 4,
                "label": "one_third",
                "fill_percentage": 33,
            })
        );
    }

    #[test]
    fn json_first_reading() {
        let line = format_event(PrintFormat::Json, &event(None, Level::EMPTY, None)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["previous_level"], serde_json::Value::Null);
        assert_eq!(value["new_level"], 0);
        assert_eq!(value["label"], serde_json::Value::Null);
        assert_eq!(value["fill_percentage"], 0);
    }
}
