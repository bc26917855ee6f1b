//! Decoding many composites at once.
//!
//! Inputs are independent, so with the `parallel` feature (default) they
//! are decoded across threads with rayon. Output order always matches
//! input order.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use hl7_types::Schema;
use tracing::{debug, warn};

use crate::record::CompositeRecord;
use crate::types::{CodecConfig, DecodeStats, Hl7Result};

/// Decodes every input against `schema`, keeping per-input results.
///
/// # Errors
/// Fails up front with [`Hl7Error::SchemaMismatch`](crate::Hl7Error::SchemaMismatch)
/// if the schema is invalid; conversion errors are reported per input.
///
/// # Examples
///
/// ```
/// use hl7_codec::decode_all;
/// use hl7_types::well_known;
///
/// let results = decode_all(&["Doe^John", "Roe^Jane^Q"], '^', well_known::xpn()).unwrap();
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[1].as_ref().unwrap().text("given_name"), Some("Jane"));
/// ```
pub fn decode_all<'s, S>(
    raws: &[S],
    delimiter: char,
    schema: &'s Schema,
) -> Hl7Result<Vec<Hl7Result<CompositeRecord<'s>>>>
where
    S: AsRef<str> + Sync,
{
    schema.validate()?;
    Ok(decode_slice(raws, delimiter, schema)
        .into_iter()
        .map(|result| result.map(|(record, _)| record))
        .collect())
}

/// Decodes every input, returning the successful records and statistics.
///
/// Inputs that fail to convert are logged and counted, not returned.
pub fn decode_batch<'s, S>(
    raws: &[S],
    config: &CodecConfig,
    schema: &'s Schema,
) -> Hl7Result<(Vec<CompositeRecord<'s>>, DecodeStats)>
where
    S: AsRef<str> + Sync,
{
    schema.validate()?;
    let start = Instant::now();

    let (records, mut stats) = collect_chunk(raws, config.delimiter, schema);
    stats.decode_time_ms = start.elapsed().as_millis() as u64;

    debug!(
        datatype = schema.name(),
        total = stats.total,
        decoded = stats.decoded,
        errors = stats.errors,
        "batch decoded"
    );

    Ok((records, stats))
}

/// Decodes inputs in chunks of `config.batch_size`, calling `callback`
/// with the records of each chunk.
///
/// Useful when the caller wants to hand records on without holding every
/// decoded record in memory at once.
pub fn decode_batched<'s, S, F>(
    raws: &[S],
    config: &CodecConfig,
    schema: &'s Schema,
    mut callback: F,
) -> Hl7Result<DecodeStats>
where
    S: AsRef<str> + Sync,
    F: FnMut(Vec<CompositeRecord<'s>>) -> Hl7Result<()>,
{
    schema.validate()?;
    let start = Instant::now();
    let mut stats = DecodeStats::default();

    for chunk in raws.chunks(config.batch_size.max(1)) {
        let (records, chunk_stats) = collect_chunk(chunk, config.delimiter, schema);
        stats.merge(&chunk_stats);
        if !records.is_empty() {
            callback(records)?;
        }
    }

    stats.decode_time_ms = start.elapsed().as_millis() as u64;
    Ok(stats)
}

fn collect_chunk<'s, S>(
    raws: &[S],
    delimiter: char,
    schema: &'s Schema,
) -> (Vec<CompositeRecord<'s>>, DecodeStats)
where
    S: AsRef<str> + Sync,
{
    let mut stats = DecodeStats {
        total: raws.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(raws.len());

    for (index, result) in decode_slice(raws, delimiter, schema).into_iter().enumerate() {
        match result {
            Ok((record, clipped)) => {
                if clipped > 0 {
                    stats.clipped += 1;
                }
                records.push(record);
            }
            Err(e) => {
                warn!(datatype = schema.name(), index, error = %e, "skipping composite");
                stats.errors += 1;
            }
        }
    }

    stats.decoded = records.len();
    (records, stats)
}

#[cfg(feature = "parallel")]
fn decode_slice<'s, S>(
    raws: &[S],
    delimiter: char,
    schema: &'s Schema,
) -> Vec<Hl7Result<(CompositeRecord<'s>, usize)>>
where
    S: AsRef<str> + Sync,
{
    raws.par_iter()
        .map(|raw| CompositeRecord::decode_validated(raw.as_ref(), delimiter, schema))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_slice<'s, S>(
    raws: &[S],
    delimiter: char,
    schema: &'s Schema,
) -> Vec<Hl7Result<(CompositeRecord<'s>, usize)>>
where
    S: AsRef<str> + Sync,
{
    raws.iter()
        .map(|raw| CompositeRecord::decode_validated(raw.as_ref(), delimiter, schema))
        .collect()
}
