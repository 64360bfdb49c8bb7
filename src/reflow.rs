use log::debug;

use crate::segmenter::{chunk_at, chunks_of, ratios_of};
use crate::subtitle_processor::SubtitleEntry;

// @module: Time-proportional re-segmentation of parsed tracks

/// Two equal-length sequences where slot k shares the same time window
#[derive(Debug, Clone)]
pub struct AlignedTracks {
    /// Primary track, one entry per shared slot (plus the unpaired tail)
    pub primary: Vec<SubtitleEntry>,

    /// Secondary track, one entry per shared slot
    pub secondary: Vec<SubtitleEntry>,
}

/// Split long entries into display-sized sub-entries, redistributing each
/// entry's time range proportionally by character count.
///
/// Entries that segment to a single chunk are passed through unchanged;
/// source order is preserved and sub-entries of one source entry are
/// contiguous and non-overlapping by construction.
pub fn expand_entries(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut result = Vec::with_capacity(entries.len());
    for entry in entries {
        expand_into(entry, &mut result);
    }

    debug!("Expanded {} entries into {} display slots", entries.len(), result.len());
    result
}

fn expand_into(entry: &SubtitleEntry, out: &mut Vec<SubtitleEntry>) {
    let chunks = chunks_of(&entry.text);
    if chunks.len() <= 1 {
        out.push(entry.clone());
        return;
    }

    let duration = entry.duration();
    let ratios = ratios_of(&chunks);
    for (i, chunk) in chunks.iter().enumerate() {
        out.push(SubtitleEntry::new(
            entry.start + ratios[i] * duration,
            entry.start + ratios[i + 1] * duration,
            chunk.clone(),
        ));
    }
}

/// Merge the segmentation ratios of two tracks block-by-block so both
/// occupy identical time slots and can be displayed as bilingual pairs.
///
/// For each index pair the primary entry's window governs. Whichever track
/// segments into more chunks supplies the slot boundaries (tie favors
/// primary); the other track holds the chunk of its own that is in effect
/// at each slot's midpoint ratio instead of being resegmented. Primary
/// entries beyond the shorter track's length degrade to standalone
/// expansion; the secondary gets no corresponding tail.
///
/// Alignment quality assumes block-for-block correspondence between the
/// two inputs. No cross-track re-anchoring or fuzzy matching is attempted.
pub fn align_entries(primary: &[SubtitleEntry], secondary: &[SubtitleEntry]) -> AlignedTracks {
    let mut primary_subs = Vec::with_capacity(primary.len());
    let mut secondary_subs = Vec::with_capacity(secondary.len());
    let paired = primary.len().min(secondary.len());

    for i in 0..paired {
        let pe = &primary[i];
        let se = &secondary[i];
        let start = pe.start;
        let duration = pe.duration();

        let p_chunks = chunks_of(&pe.text);
        let s_chunks = chunks_of(&se.text);
        let p_ratios = ratios_of(&p_chunks);
        let s_ratios = ratios_of(&s_chunks);

        let primary_is_master = p_chunks.len() >= s_chunks.len();
        let (master_chunks, master_ratios, other_chunks, other_ratios) = if primary_is_master {
            (&p_chunks, &p_ratios, &s_chunks, &s_ratios)
        } else {
            (&s_chunks, &s_ratios, &p_chunks, &p_ratios)
        };

        for j in 0..master_chunks.len() {
            let r_mid = (master_ratios[j] + master_ratios[j + 1]) / 2.0;
            let slot_start = start + master_ratios[j] * duration;
            let slot_end = start + master_ratios[j + 1] * duration;
            let master_text = master_chunks[j].as_str();
            let other_text = chunk_at(other_chunks, other_ratios, r_mid);

            let (p_text, s_text) = if primary_is_master {
                (master_text, other_text)
            } else {
                (other_text, master_text)
            };

            primary_subs.push(SubtitleEntry::new(slot_start, slot_end, p_text));
            secondary_subs.push(SubtitleEntry::new(slot_start, slot_end, s_text));
        }
    }

    // Primary blocks beyond secondary coverage fall back to plain expansion
    for entry in &primary[paired..] {
        expand_into(entry, &mut primary_subs);
    }

    debug!(
        "Aligned {} paired blocks into {} slots ({} primary tail entries)",
        paired,
        secondary_subs.len(),
        primary.len() - paired
    );

    AlignedTracks {
        primary: primary_subs,
        secondary: secondary_subs,
    }
}
