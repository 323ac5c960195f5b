//! Minimal AIFF writer: 16-bit mono PCM with exactly a `COMM` and an `SSND`
//! chunk, the only layout the engine's loader accepts.

use std::io::{self, Write};

const COMM_SIZE: u32 = 18;
const BITS_PER_SAMPLE: u16 = 16;

/// Sample rate as an 80-bit IEEE 754 extended float, big-endian.
pub fn extended_rate(rate: u32) -> [u8; 10] {
    let mut out = [0; 10];
    if rate == 0 {
        return out;
    }
    let exponent = 31 - rate.leading_zeros();
    let biased = (16383 + exponent) as u16;
    let mantissa = (rate as u64) << (63 - exponent);
    out[..2].copy_from_slice(&biased.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}

pub fn write<W: Write>(samples: &[i16], sample_rate: u32, writer: &mut W) -> io::Result<()> {
    let data_len = (samples.len() * 2) as u32;
    let ssnd_size = 8 + data_len;
    let form_size = 4 + (8 + COMM_SIZE) + (8 + ssnd_size);

    writer.write_all(b"FORM")?;
    writer.write_all(&form_size.to_be_bytes())?;
    writer.write_all(b"AIFF")?;

    writer.write_all(b"COMM")?;
    writer.write_all(&COMM_SIZE.to_be_bytes())?;
    writer.write_all(&1u16.to_be_bytes())?;
    writer.write_all(&(samples.len() as u32).to_be_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_be_bytes())?;
    writer.write_all(&extended_rate(sample_rate))?;

    writer.write_all(b"SSND")?;
    writer.write_all(&ssnd_size.to_be_bytes())?;
    // offset, block size
    writer.write_all(&[0; 8])?;
    for sample in samples {
        writer.write_all(&sample.to_be_bytes())?;
    }
    Ok(())
}
