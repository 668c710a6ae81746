use serde_json::Value;
use tracing::{debug, trace};

use crate::error::ProcessError;
use crate::model::{Record, StationExtremes, StationTable};

/// Process a stream of telemetry records lazily: samples update per-station
/// extremes and are echoed unmodified; `snapshot`/`reset` control commands
/// emit a copy of the extremes or clear them. Input is pulled one record at
/// a time, so unbounded sources work without buffering.
pub fn process_events<I>(events: I) -> EventStream<I::IntoIter>
where
    I: IntoIterator<Item = Record>,
{
    EventStream {
        events: events.into_iter(),
        stations: StationTable::new(),
        latest_timestamp: None,
        failed: false,
    }
}

/// Pull-based output stream over one pass of the input. Owns all processor
/// state; dropping it mid-stream just discards that state.
pub struct EventStream<I> {
    events: I,
    stations: StationTable,
    latest_timestamp: Option<Value>,
    failed: bool,
}

impl<I> Iterator for EventStream<I>
where
    I: Iterator<Item = Record>,
{
    type Item = Result<Record, ProcessError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let event = self.events.next()?;
            match self.step(event) {
                Ok(Some(out)) => return Some(Ok(out)),
                // guarded control message that emitted nothing
                Ok(None) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<I> EventStream<I> {
    fn step(&mut self, event: Record) -> Result<Option<Record>, ProcessError> {
        match event.get("type").and_then(Value::as_str) {
            Some("sample") => {
                self.apply_sample(&event)?;
                // echo the input record untouched, extra fields and all
                Ok(Some(event))
            }
            Some("control") => self.apply_control(&event),
            _ => Err(ProcessError::UnknownMessageType {
                message_type: field_repr(event.get("type")),
            }),
        }
    }

    fn apply_sample(&mut self, event: &Record) -> Result<(), ProcessError> {
        let station = match event.get("stationName") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => return Err(ProcessError::invalid_field("stationName", other)),
            None => return Err(ProcessError::MissingField {
                field: "stationName",
            }),
        };
        let temperature = match event.get("temperature") {
            Some(v) => v
                .as_f64()
                .ok_or_else(|| ProcessError::invalid_field("temperature", v))?,
            None => return Err(ProcessError::MissingField {
                field: "temperature",
            }),
        };
        // timestamps are opaque: presence is required, type is not
        let timestamp = event
            .get("timestamp")
            .cloned()
            .ok_or(ProcessError::MissingField { field: "timestamp" })?;

        trace!(%station, temperature, "sample");
        self.latest_timestamp = Some(timestamp);
        self.stations
            .entry(station)
            .and_modify(|ext| ext.observe(temperature))
            .or_insert_with(|| StationExtremes::new(temperature));
        Ok(())
    }

    fn apply_control(&mut self, event: &Record) -> Result<Option<Record>, ProcessError> {
        match event.get("command").and_then(Value::as_str) {
            Some("snapshot") => self.snapshot(),
            Some("reset") => Ok(self.reset()),
            _ => Err(ProcessError::UnknownCommand {
                command: field_repr(event.get("command")),
            }),
        }
    }

    // None while no sample has been recorded since start or the last reset
    fn snapshot(&self) -> Result<Option<Record>, ProcessError> {
        let as_of = match &self.latest_timestamp {
            Some(ts) if !self.stations.is_empty() => ts.clone(),
            _ => return Ok(None),
        };
        debug!(stations = self.stations.len(), "emitting snapshot");
        let mut out = Record::new();
        out.insert("type".to_string(), Value::from("snapshot"));
        out.insert("asOf".to_string(), as_of);
        // independent copy: later samples must not alter an emitted snapshot
        out.insert("stations".to_string(), serde_json::to_value(&self.stations)?);
        Ok(Some(out))
    }

    // a reset with nothing recorded emits nothing and leaves state untouched
    fn reset(&mut self) -> Option<Record> {
        let as_of = match self.latest_timestamp.take() {
            Some(ts) if !self.stations.is_empty() => ts,
            other => {
                self.latest_timestamp = other;
                return None;
            }
        };
        debug!(stations = self.stations.len(), "reset");
        self.stations.clear();
        let mut out = Record::new();
        out.insert("type".to_string(), Value::from("reset"));
        out.insert("asOf".to_string(), as_of);
        Some(out)
    }
}

fn field_repr(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
