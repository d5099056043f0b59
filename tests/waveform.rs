mod common;

use rand::Rng;

use ds1000z::{Config, DS1000Z, Error, Source, WaveMode};
use ds1000z::devices::ds1000z::waveform::{partition, WaveFormat};
use common::SimulatedScope;

fn fetch(scope:&mut SimulatedScope, source:Source, mode:WaveMode) -> ds1000z::Result<ds1000z::WaveformSeries> {
	let mut dev = DS1000Z::new(scope, &Config::default())?;
	dev.fetch_waveform(source, mode)
}

#[test]
fn single_small_waveform() {
	let mut scope = SimulatedScope::with_points(1200);
	let series = fetch(&mut scope, Source::Channel(1), WaveMode::Normal).unwrap();

	assert_eq!(scope.commands(), vec![
		":STOP",
		":WAVeform:SOURce CHANnel1",
		":WAVeform:MODE NORMal",
		":WAVeform:FORMat BYTE",
		":WAVeform:PREamble?",
		":WAVeform:STARt 1",
		":WAVeform:STOP 1200",
		":WAVeform:DATA?",
	]);
	assert_eq!(series.len(), 1200);
	assert_eq!(series.voltages.len(), 1200);
}

#[test]
fn exact_multi_block_waveform() {
	let mut scope = SimulatedScope::with_points(500_000);
	let series = fetch(&mut scope, Source::Channel(2), WaveMode::Raw).unwrap();

	assert_eq!(scope.ranges(), vec![(1, 250_000), (250_001, 500_000)]);
	assert_eq!(scope.count(":WAVeform:DATA?"), 2);
	assert_eq!(series.len(), 500_000);
}

#[test]
fn multi_block_waveform_with_remainder() {
	let mut scope = SimulatedScope::with_points(600_000);
	let series = fetch(&mut scope, Source::Math, WaveMode::Raw).unwrap();

	assert_eq!(scope.ranges(), vec![(1, 250_000), (250_001, 500_000), (500_001, 600_000)]);
	assert_eq!(series.len(), 600_000);

	// Blocks land in acquisition order
	let expected:Vec<f64> = scope.samples.iter().map(|&s| (s as f64 - 127.0) * 0.04).collect();
	assert_eq!(series.voltages, expected);
}

#[test]
fn truncated_block_is_a_data_integrity_error() {
	let mut scope = SimulatedScope::with_points(600_000);
	scope.truncate_data_read = Some((1, 10));

	match fetch(&mut scope, Source::Channel(1), WaveMode::Raw) {
		Err(Error::DataIntegrity{ start, stop, expected, received }) => {
			assert_eq!((start, stop), (250_001, 500_000));
			assert_eq!(expected, 250_000);
			assert_eq!(received, 249_990);
		},
		other => panic!("expected a data integrity error, got {:?}", other.map(|s| s.len())),
	}

	// Nothing after the bad block is requested
	assert_eq!(scope.count(":WAVeform:DATA?"), 2);
}

#[test]
fn transfer_cut_inside_the_header_is_a_data_integrity_error() {
	let mut scope = SimulatedScope::with_points(1200);
	scope.cut_data_read = Some((0, 5));

	match fetch(&mut scope, Source::Channel(1), WaveMode::Normal) {
		Err(Error::DataIntegrity{ start, stop, expected, received }) => {
			assert_eq!((start, stop), (1, 1200));
			assert_eq!(expected, 1200);
			assert_eq!(received, 0);
		},
		other => panic!("expected a data integrity error, got {:?}", other.map(|s| s.len())),
	}
}

#[test]
fn transfer_cut_after_the_header_is_a_data_integrity_error() {
	let mut scope = SimulatedScope::with_points(600_000);
	scope.cut_data_read = Some((2, 11));

	let res = fetch(&mut scope, Source::Channel(1), WaveMode::Raw);
	assert!(matches!(res, Err(Error::DataIntegrity{ start: 500_001, received: 0, .. })));
}

#[test]
fn failed_block_read_aborts_the_fetch() {
	let mut scope = SimulatedScope::with_points(600_000);
	scope.fail_data_read = Some(2);

	let res = fetch(&mut scope, Source::Channel(1), WaveMode::Raw);
	assert!(matches!(res, Err(Error::Transport(_))));
}

#[test]
fn malformed_preamble_is_a_parse_error() {
	let mut scope = SimulatedScope::with_points(1200);
	scope.preamble_override = Some("0,0,1200,1,1e-06,-6e-04,0,0.04,0".to_owned());

	let res = fetch(&mut scope, Source::Channel(1), WaveMode::Normal);
	assert!(matches!(res, Err(Error::Parse{ .. })));
	assert_eq!(scope.count(":WAVeform:DATA?"), 0);
}

#[test]
fn empty_acquisition_yields_empty_series() {
	let mut scope = SimulatedScope::with_points(0);
	let series = fetch(&mut scope, Source::Channel(1), WaveMode::Normal).unwrap();

	assert!(series.is_empty());
	assert!(scope.ranges().is_empty());
	assert_eq!(scope.count(":WAVeform:DATA?"), 0);
}

#[test]
fn unit_scaling_returns_raw_samples() {
	let mut scope = SimulatedScope::with_samples((0..=255).collect());
	scope.y_increment = 1.0;
	scope.y_reference = 0.0;

	let series = fetch(&mut scope, Source::Channel(3), WaveMode::Normal).unwrap();
	for (i, v) in series.voltages.iter().enumerate() {
		assert_eq!(*v, i as f64);
	}
}

#[test]
fn time_axis_starts_at_zero_and_ignores_x_origin() {
	let mut scope = SimulatedScope::with_points(1200);
	scope.x_increment = 2e-5;
	scope.x_origin = -1.2e-2;

	let series = fetch(&mut scope, Source::Channel(1), WaveMode::Normal).unwrap();
	assert_eq!(series.times[0], 0.0);
	for (i, t) in series.times.iter().enumerate() {
		assert_eq!(*t, i as f64 * 2e-5);
	}
	for w in series.times.windows(2) {
		assert!((w[1] - w[0] - 2e-5).abs() < 1e-15);
	}
}

#[test]
fn digital_source_token() {
	let mut scope = SimulatedScope::with_points(1200);
	fetch(&mut scope, Source::Digital(3), WaveMode::Maximum).unwrap();
	assert!(scope.commands().contains(&":WAVeform:SOURce D3"));
	assert!(scope.commands().contains(&":WAVeform:MODE MAXimum"));
}

#[test]
fn invalid_source_sends_nothing() {
	let mut scope = SimulatedScope::with_points(1200);
	let res = fetch(&mut scope, Source::Channel(5), WaveMode::Normal);
	assert!(matches!(res, Err(Error::InvalidArgument(_))));
	assert!(scope.commands().is_empty());
}

#[test]
fn raw_fetch_keeps_preamble() {
	let mut scope = SimulatedScope::with_points(1200);
	let mut dev = DS1000Z::new(&mut scope, &Config::default()).unwrap();
	let raw = dev.fetch_waveform_raw(Source::Channel(1), WaveMode::Normal).unwrap();

	assert_eq!(raw.preamble.points, 1200);
	assert_eq!(raw.preamble.format, WaveFormat::Byte);
	assert_eq!(raw.samples.len(), 1200);
}

#[test]
fn preamble_is_read_fresh_for_every_fetch() {
	let mut scope = SimulatedScope::with_points(1200);
	{
		let mut dev = DS1000Z::new(&mut scope, &Config::default()).unwrap();
		dev.fetch_waveform(Source::Channel(1), WaveMode::Normal).unwrap();
		dev.link_mut().samples = vec![0; 300_000];
		let series = dev.fetch_waveform(Source::Channel(1), WaveMode::Raw).unwrap();
		assert_eq!(series.len(), 300_000);
	}
	assert_eq!(scope.count(":WAVeform:PREamble?"), 2);
}

#[test]
fn random_partitions_cover_every_point() {
	let mut rng = rand::thread_rng();
	for _ in 0..200 {
		let max_points:usize = rng.gen_range(1..300_000);
		let points:usize = rng.gen_range(0..3_000_000);
		let blocks = partition(points, max_points);

		assert_eq!(blocks.iter().map(|b| b.len()).sum::<usize>(), points);
		assert!(blocks.iter().all(|b| b.len() <= max_points && !b.is_empty()));
		assert!(blocks.iter().filter(|b| b.len() < max_points).count() <= 1);
		if let Some(last) = blocks.last() {
			assert_eq!(last.stop, points);
		}
		for w in blocks.windows(2) {
			assert_eq!(w[1].start, w[0].stop + 1);
			assert_eq!(w[0].len(), max_points);
		}
		if points % max_points == 0 {
			assert_eq!(blocks.len(), points / max_points);
		}
	}
}
