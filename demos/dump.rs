//! Example program that decodes a MIDI file and prints its header, tracks and diagnostics

use midiscan::{reader::MidiReadable, MidiFile, ReadOptions};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "test/two_tracks.mid".to_string());

    let mut source = path.get_midi_source().expect("Open MIDI file");
    let (midi, diagnostics) =
        MidiFile::open_with(&mut source, &ReadOptions::lenient()).expect("Decode MIDI file");

    println!(
        "format {:?}, {} tracks declared, division {:?}",
        midi.header.format(),
        midi.header.track_count(),
        midi.header.division()
    );

    for (index, track) in midi.tracks.iter().enumerate() {
        println!(
            "track {index}: `{}`, tempo {:?}, {} events",
            track.name,
            track.tempo,
            track.events.len()
        );
    }

    for diagnostic in &diagnostics {
        println!("warning: {diagnostic}");
    }
}
