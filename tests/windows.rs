use circos_mag::io::sequence::Contig;
use circos_mag::io::tracks::write_windows;
use circos_mag::style::PlotStyle;
use circos_mag::track::{gc_track, WindowBounds};
use rand::Rng;

fn random_sequence(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let bases = ['A', 'C', 'G', 'T', 'N'];
    (0..len).map(|_| bases[rng.gen_range(0..5)]).collect()
}

#[test]
fn test_trailing_window_is_shifted_back() {
    let contig = Contig::new("contig_1", random_sequence(2050));
    let track = gc_track(&[contig], &PlotStyle::default().gc).unwrap();

    let bounds: Vec<(usize, usize)> = track.points.iter().map(|p| (p.start, p.end)).collect();
    assert_eq!(bounds, vec![(0, 1000), (1000, 2000), (1050, 2050)]);
}

#[test]
fn test_windows_partition_the_contig() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let window = rng.gen_range(1..500);
        let len = rng.gen_range(window..5000);

        let bounds: Vec<(usize, usize)> = WindowBounds::new(len, window).unwrap().collect();
        let mut covered = vec![0u32; len];
        for &(start, end) in &bounds {
            assert_eq!(end - start, window);
            for c in &mut covered[start..end] {
                *c += 1;
            }
        }
        assert!(covered.iter().all(|&c| c >= 1), "gap for len={} window={}", len, window);

        // only the shifted trailing window may overlap its predecessor
        let body = &bounds[..bounds.len() - 1];
        for pair in body.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }
}

#[test]
fn test_gc_deviation_signs_and_output() {
    let contigs = vec![
        Contig::new("gc_rich", "GCGCGCGCGC"),
        Contig::new("at_rich", "ATATATATAT"),
    ];
    let mut style = PlotStyle::default();
    style.gc.window_size = 10;
    let track = gc_track(&contigs, &style.gc).unwrap();
    assert_eq!(track.mean_gc, 50.0);

    let mut buf = Vec::new();
    write_windows(&mut buf, &track.points).unwrap();
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "gc_rich 0 10 50 fill_color=dorange\nat_rich 0 10 -50 fill_color=dblue\n"
    );
}

#[test]
fn test_gc_values_within_bounds() {
    let contigs: Vec<Contig> = (0..5)
        .map(|i| Contig::new(format!("c{}", i), random_sequence(3000 + i * 17)))
        .collect();
    let track = gc_track(&contigs, &PlotStyle::default().gc).unwrap();
    assert!(track.mean_gc >= 0.0 && track.mean_gc <= 100.0);
    for p in &track.points {
        let window_gc = p.value + track.mean_gc;
        assert!((-1e-9..=100.0 + 1e-9).contains(&window_gc));
    }
}
