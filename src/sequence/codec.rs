//! Binary wire format.
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! count: i32 | lower_inc: u8 | upper_inc: u8 | linear: u8
//! count x (t: i64 | payload)
//! ```
//!
//! The payload depends on the base kind, which is carried out of band.
//! Text values are length prefixed. Points carry their SRID and a flag byte
//! before the coordinates.

use super::Sequence;
use crate::config::Config;
use crate::error::{Result, TseqError};
use crate::types::Interpolation;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tseq_types::point::GeoPoint;
use tseq_types::{Instant, Value, ValueKind};

const FLAG_HAS_Z: u8 = 0x01;
const FLAG_GEODETIC: u8 = 0x02;

const HEADER_LEN: usize = 4 + 3;
const TIMESTAMP_LEN: usize = 8;

impl Sequence {
    /// Serialize into the wire format.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_capacity());

        buf.put_i32(self.instants.len() as i32);
        buf.put_u8(u8::from(self.period.lower_inc));
        buf.put_u8(u8::from(self.period.upper_inc));
        buf.put_u8(u8::from(self.interp.is_linear()));

        for inst in &self.instants {
            buf.put_i64(inst.t);
            put_value(&mut buf, &inst.value);
        }

        buf.freeze()
    }

    fn encoded_capacity(&self) -> usize {
        HEADER_LEN
            + self
                .instants
                .iter()
                .map(|inst| TIMESTAMP_LEN + payload_len(&inst.value))
                .sum::<usize>()
    }

    /// Read one sequence of base kind `kind` from the front of `buf`.
    ///
    /// The instant run goes through the same validation as
    /// [`Sequence::make_with_config`]; bytes past the sequence are left in
    /// the buffer.
    pub fn decode<B: Buf>(buf: &mut B, kind: ValueKind, config: &Config) -> Result<Sequence> {
        ensure(buf, HEADER_LEN)?;
        let count = buf.get_i32();
        if count <= 0 {
            log::warn!("rejecting encoded sequence with instant count {}", count);
            return Err(TseqError::Decode(format!("Invalid instant count {}", count)));
        }
        let count = count as usize;
        if count > config.max_instants {
            log::warn!(
                "rejecting encoded sequence of {} instants (limit {})",
                count,
                config.max_instants
            );
            return Err(TseqError::Decode(format!(
                "Instant count {} exceeds the configured maximum of {}",
                count, config.max_instants
            )));
        }

        let lower_inc = get_flag(buf)?;
        let upper_inc = get_flag(buf)?;
        let interp = Interpolation::from_linear(get_flag(buf)?);

        // Never trust the count for preallocation beyond what the buffer can hold
        let mut instants = Vec::with_capacity(count.min(buf.remaining() / TIMESTAMP_LEN));
        for _ in 0..count {
            ensure(buf, TIMESTAMP_LEN)?;
            let t = buf.get_i64();
            let value = get_value(buf, kind)?;
            instants.push(Instant::new(value, t));
        }

        Sequence::make_with_config(instants, lower_inc, upper_inc, interp, config)
    }
}

fn payload_len(value: &Value) -> usize {
    match value {
        Value::Bool(_) => 1,
        Value::Int(_) => 4,
        Value::Float(_) => 8,
        Value::Text(s) => 4 + s.len(),
        Value::Point(p) => 4 + 1 + if p.has_z() { 24 } else { 16 },
        Value::Double2(_) => 16,
        Value::Double3(_) => 24,
        Value::Double4(_) => 32,
    }
}

fn put_value(buf: &mut BytesMut, value: &Value) {
    match value {
        Value::Bool(b) => buf.put_u8(u8::from(*b)),
        Value::Int(i) => buf.put_i32(*i),
        Value::Float(f) => buf.put_f64(*f),
        Value::Text(s) => {
            buf.put_u32(s.len() as u32);
            buf.put(s.as_bytes());
        }
        Value::Point(p) => {
            buf.put_i32(p.srid);
            let mut flags = 0;
            if p.has_z() {
                flags |= FLAG_HAS_Z;
            }
            if p.is_geodetic() {
                flags |= FLAG_GEODETIC;
            }
            buf.put_u8(flags);
            buf.put_f64(p.x);
            buf.put_f64(p.y);
            if let Some(z) = p.z {
                buf.put_f64(z);
            }
        }
        Value::Double2(d) => d.iter().for_each(|x| buf.put_f64(*x)),
        Value::Double3(d) => d.iter().for_each(|x| buf.put_f64(*x)),
        Value::Double4(d) => d.iter().for_each(|x| buf.put_f64(*x)),
    }
}

fn get_value<B: Buf>(buf: &mut B, kind: ValueKind) -> Result<Value> {
    Ok(match kind {
        ValueKind::Bool => Value::Bool(get_flag(buf)?),
        ValueKind::Int => {
            ensure(buf, 4)?;
            Value::Int(buf.get_i32())
        }
        ValueKind::Float => {
            ensure(buf, 8)?;
            Value::Float(buf.get_f64())
        }
        ValueKind::Text => {
            ensure(buf, 4)?;
            let len = buf.get_u32() as usize;
            ensure(buf, len)?;
            let mut bytes = vec![0u8; len];
            buf.copy_to_slice(&mut bytes);
            let text = String::from_utf8(bytes)
                .map_err(|e| TseqError::Decode(format!("Invalid UTF-8 text value: {}", e)))?;
            Value::Text(text)
        }
        ValueKind::GeomPoint | ValueKind::GeogPoint => Value::Point(get_point(buf, kind)?),
        ValueKind::Double2 => Value::Double2(get_doubles(buf)?),
        ValueKind::Double3 => Value::Double3(get_doubles(buf)?),
        ValueKind::Double4 => Value::Double4(get_doubles(buf)?),
    })
}

fn get_point<B: Buf>(buf: &mut B, kind: ValueKind) -> Result<GeoPoint> {
    ensure(buf, 5)?;
    let srid = buf.get_i32();
    let flags = buf.get_u8();
    if flags & !(FLAG_HAS_Z | FLAG_GEODETIC) != 0 {
        log::warn!("rejecting point with unknown flags {:#04x}", flags);
        return Err(TseqError::Decode(format!("Unknown point flags {:#04x}", flags)));
    }
    let geodetic = flags & FLAG_GEODETIC != 0;
    if geodetic != (kind == ValueKind::GeogPoint) {
        return Err(TseqError::Decode(format!(
            "Point flags do not match the {} base kind",
            kind
        )));
    }
    let has_z = flags & FLAG_HAS_Z != 0;
    ensure(buf, if has_z { 24 } else { 16 })?;
    let x = buf.get_f64();
    let y = buf.get_f64();
    let z = has_z.then(|| buf.get_f64());
    Ok(GeoPoint {
        x,
        y,
        z,
        srid,
        geodetic,
    })
}

fn get_doubles<B: Buf, const N: usize>(buf: &mut B) -> Result<[f64; N]> {
    ensure(buf, 8 * N)?;
    let mut out = [0.0; N];
    for x in out.iter_mut() {
        *x = buf.get_f64();
    }
    Ok(out)
}

fn get_flag<B: Buf>(buf: &mut B) -> Result<bool> {
    ensure(buf, 1)?;
    match buf.get_u8() {
        0 => Ok(false),
        1 => Ok(true),
        other => {
            log::warn!("rejecting invalid flag byte {:#04x}", other);
            Err(TseqError::Decode(format!("Invalid flag byte {:#04x}", other)))
        }
    }
}

fn ensure<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        log::warn!(
            "truncated sequence encoding: needed {} bytes, {} left",
            needed,
            buf.remaining()
        );
        return Err(TseqError::Decode("Unexpected end of input".to_string()));
    }
    Ok(())
}
