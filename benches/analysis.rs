//! Analysis pipeline benchmarks
//!
//! Measures the three CPU-heavy stages over synthetic signals:
//!
//! - spectrogram: parallel STFT over the mono mix
//! - forensics: full battery (ENF periodogram dominates)
//! - decode: WAV file to canonical buffer
//!
//! # Running
//!
//! ```bash
//! cargo bench --bench analysis
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use phonoscope::{forensics, DecoderConfig, SpectrogramEngine};

fn sine(freq: f64, seconds: f64, sample_rate: u32, amplitude: f64) -> Vec<f32> {
    let n = (seconds * f64::from(sample_rate)) as usize;
    (0..n)
        .map(|i| {
            (amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / f64::from(sample_rate)).sin())
                as f32
        })
        .collect()
}

fn bench_spectrogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrogram");
    let engine = SpectrogramEngine::new();

    for seconds in [1.0, 5.0, 30.0] {
        let signal = sine(440.0, seconds, 44_100, 0.5);
        group.throughput(Throughput::Elements(signal.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("compute", format!("{seconds}s")),
            &signal,
            |b, signal| {
                b.iter(|| {
                    black_box(
                        engine
                            .compute(black_box(signal), 44_100, 8_000.0)
                            .expect("compute"),
                    )
                });
            },
        );
    }
    group.finish();
}

fn bench_forensics(c: &mut Criterion) {
    let mut group = c.benchmark_group("forensics");
    group.sample_size(10);

    for seconds in [1.0, 5.0] {
        let signal = sine(60.0, seconds, 44_100, 0.5);
        group.throughput(Throughput::Elements(signal.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("analyze", format!("{seconds}s")),
            &signal,
            |b, signal| {
                b.iter(|| black_box(forensics::analyze(signal, signal, 44_100)));
            },
        );
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bench.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("create");
    for s in sine(440.0, 10.0, 44_100, 0.5) {
        let q = (s * 32_767.0) as i16;
        writer.write_sample(q).expect("write");
        writer.write_sample(q).expect("write");
    }
    writer.finalize().expect("finalize");

    let bytes = std::fs::metadata(&path).expect("metadata").len();
    group.throughput(Throughput::Bytes(bytes));
    group.bench_function("wav_10s_stereo", |b| {
        b.iter(|| {
            black_box(
                phonoscope::audio::decode_file(black_box(&path), &DecoderConfig::default())
                    .expect("decode"),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, bench_spectrogram, bench_forensics, bench_decode);
criterion_main!(benches);
