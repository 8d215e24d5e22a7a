use crate::core::engine::BaziEngine;
use crate::core::report::join_elements;
use crate::domain::model::{BaziChart, BirthInput};
use crate::domain::ports::{ChartCache, OutputFormat};
use crate::utils::error::{BaziError, Result};
use serde::Serialize;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub rows: usize,
    pub failed: usize,
    pub cached_entries: usize,
}

/// Flat row for CSV output; chart columns stay empty when the row failed.
#[derive(Debug, Default, Serialize)]
struct CsvRow {
    line: usize,
    year: Option<i32>,
    month: Option<i32>,
    day: Option<i32>,
    hour: Option<i32>,
    gender: Option<String>,
    year_pillar: String,
    month_pillar: String,
    day_pillar: String,
    hour_pillar: String,
    day_master: String,
    strength: String,
    favorable_elements: String,
    unfavorable_elements: String,
    error: String,
}

impl CsvRow {
    fn new(line: usize, input: Option<&BirthInput>) -> Self {
        Self {
            line,
            year: input.map(|i| i.year),
            month: input.map(|i| i.month),
            day: input.map(|i| i.day),
            hour: input.map(|i| i.hour),
            gender: input.map(|i| i.gender.to_string()),
            ..Self::default()
        }
    }

    fn with_chart(mut self, chart: &BaziChart) -> Self {
        self.year_pillar = chart.year_pillar.to_string();
        self.month_pillar = chart.month_pillar.to_string();
        self.day_pillar = chart.day_pillar.to_string();
        self.hour_pillar = chart.hour_pillar.to_string();
        self.day_master = chart.day_master_label();
        self.strength = chart.strength.label().to_string();
        self.favorable_elements = join_elements(&chart.favorable_elements);
        self.unfavorable_elements = join_elements(&chart.unfavorable_elements);
        self
    }

    fn with_error(mut self, error: String) -> Self {
        self.error = error;
        self
    }
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<&'a BirthInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<&'a BaziChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

enum Sink<W: Write> {
    Csv(csv::Writer<W>),
    JsonLines(W),
}

impl<W: Write> Sink<W> {
    fn new(writer: W, format: OutputFormat) -> Result<Self> {
        match format {
            OutputFormat::Csv => Ok(Self::Csv(csv::Writer::from_writer(writer))),
            OutputFormat::Json => Ok(Self::JsonLines(writer)),
            OutputFormat::Text => Err(BaziError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: format.as_str().to_string(),
                reason: "Batch output supports csv or json".to_string(),
            }),
        }
    }

    fn write(
        &mut self,
        line: usize,
        input: Option<&BirthInput>,
        outcome: std::result::Result<&BaziChart, String>,
    ) -> Result<()> {
        match self {
            Self::Csv(writer) => {
                let row = CsvRow::new(line, input);
                let row = match outcome {
                    Ok(chart) => row.with_chart(chart),
                    Err(error) => row.with_error(error),
                };
                writer.serialize(row)?;
            }
            Self::JsonLines(writer) => {
                let (chart, error) = match outcome {
                    Ok(chart) => (Some(chart), None),
                    Err(error) => (None, Some(error)),
                };
                let row = JsonRow {
                    line,
                    input,
                    chart,
                    error,
                };
                serde_json::to_writer(&mut *writer, &row)?;
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        match self {
            Self::Csv(mut writer) => writer.flush()?,
            Self::JsonLines(mut writer) => writer.flush()?,
        }
        Ok(())
    }
}

fn source_line(position: Option<&csv::Position>) -> usize {
    position.map_or(0, |p| p.line() as usize)
}

/// Reads `year,month,day,hour,gender` rows and writes one output row per input row.
///
/// Rows that fail to parse or compute are written with their error text and
/// counted in the summary; only I/O and encoding failures abort the run.
pub fn run_batch<C, R, W>(
    engine: &BaziEngine<C>,
    reader: R,
    writer: W,
    format: OutputFormat,
) -> Result<BatchSummary>
where
    C: ChartCache,
    R: Read,
    W: Write,
{
    let mut sink = Sink::new(writer, format)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut summary = BatchSummary::default();

    for result in rdr.records() {
        // physical line where the record starts; blank lines and quoted
        // newlines are counted
        let (line, parsed) = match result {
            Ok(record) => (
                source_line(record.position()),
                record.deserialize::<BirthInput>(Some(&headers)),
            ),
            Err(e) => (source_line(e.position()), Err(e)),
        };
        summary.rows += 1;

        match parsed {
            Ok(input) => match engine.calculate(&input) {
                Ok(chart) => sink.write(line, Some(&input), Ok(chart.as_ref()))?,
                Err(e) if e.is_input_error() => {
                    tracing::warn!(line, "row rejected: {}", e);
                    summary.failed += 1;
                    sink.write(line, Some(&input), Err(e.to_string()))?;
                }
                Err(e) => return Err(e),
            },
            Err(e) => {
                tracing::warn!(line, "row could not be parsed: {}", e);
                summary.failed += 1;
                sink.write(line, None, Err(e.to_string()))?;
            }
        }
    }

    sink.finish()?;
    summary.cached_entries = engine.cache().len();

    tracing::info!(
        rows = summary.rows,
        failed = summary.failed,
        cached = summary.cached_entries,
        "batch finished"
    );

    Ok(summary)
}
