//! Corpus geometry: canonical token order, ayah spans and surah spans.

use std::ops::Range;

use crate::corpus::Fingerprint;
use crate::types::{AyahRef, Token};

/// A contiguous run of tokens (in canonical rank space) sharing one ayah.
#[derive(Debug, Clone)]
pub struct AyahSpan {
    pub ayah: AyahRef,
    /// Index of the owning surah in [`WindowIndex::suras`].
    pub sura_slot: usize,
    pub tokens: Range<usize>,
}

/// A contiguous run of tokens and ayahs sharing one surah.
#[derive(Debug, Clone)]
pub struct SuraSpan {
    pub sura: u32,
    pub tokens: Range<usize>,
    /// Slots into [`WindowIndex::ayahs`].
    pub ayahs: Range<usize>,
}

/// Read-only positional index over a token slice.
///
/// Tokens are ranked by `(sura, ayah, position)` regardless of the order
/// of the input slice; every range in this index lives in rank space.
#[derive(Debug, Clone, Default)]
pub struct WindowIndex {
    /// rank → token index in the source slice.
    order: Vec<usize>,
    /// token index → rank.
    rank: Vec<usize>,
    /// token index → ayah slot.
    token_ayah: Vec<usize>,
    ayahs: Vec<AyahSpan>,
    suras: Vec<SuraSpan>,
    source: Option<Fingerprint>,
}

impl WindowIndex {
    /// Build the index from a token slice.
    pub fn build(tokens: &[Token]) -> Self {
        Self::build_identified(tokens, Fingerprint::of(tokens))
    }

    /// [`Self::build`] with the slice fingerprint already computed.
    pub(crate) fn build_identified(tokens: &[Token], source: Fingerprint) -> Self {
        let mut order: Vec<usize> = (0..tokens.len()).collect();
        order.sort_by_key(|&i| tokens[i].address());

        let mut rank = vec![0usize; tokens.len()];
        let mut token_ayah = vec![0usize; tokens.len()];
        let mut ayahs: Vec<AyahSpan> = Vec::new();
        let mut suras: Vec<SuraSpan> = Vec::new();

        for (r, &idx) in order.iter().enumerate() {
            rank[idx] = r;
            let token = &tokens[idx];

            if suras.last().map(|s| s.sura) != Some(token.sura) {
                suras.push(SuraSpan {
                    sura: token.sura,
                    tokens: r..r,
                    ayahs: ayahs.len()..ayahs.len(),
                });
            }
            let sura_slot = suras.len() - 1;

            let ayah = token.ayah_ref();
            if ayahs.last().map(|a| a.ayah) != Some(ayah) {
                ayahs.push(AyahSpan {
                    ayah,
                    sura_slot,
                    tokens: r..r,
                });
            }
            let ayah_slot = ayahs.len() - 1;

            ayahs[ayah_slot].tokens.end = r + 1;
            suras[sura_slot].tokens.end = r + 1;
            suras[sura_slot].ayahs.end = ayah_slot + 1;
            token_ayah[idx] = ayah_slot;
        }

        Self {
            order,
            rank,
            token_ayah,
            ayahs,
            suras,
            source: Some(source),
        }
    }

    /// Fingerprint of the token slice this index was built from.
    pub fn source(&self) -> Option<Fingerprint> {
        self.source
    }

    pub fn token_count(&self) -> usize {
        self.order.len()
    }

    pub fn ayah_count(&self) -> usize {
        self.ayahs.len()
    }

    pub fn sura_count(&self) -> usize {
        self.suras.len()
    }

    pub fn ayahs(&self) -> &[AyahSpan] {
        &self.ayahs
    }

    pub fn suras(&self) -> &[SuraSpan] {
        &self.suras
    }

    /// Token index at a canonical rank.
    pub fn token_at(&self, rank: usize) -> usize {
        self.order[rank]
    }

    /// Canonical rank of a token index.
    pub fn rank_of(&self, token: usize) -> usize {
        self.rank[token]
    }

    /// Ayah slot of a token index.
    pub fn ayah_slot_of(&self, token: usize) -> usize {
        self.token_ayah[token]
    }

    /// Surah slot of a token index.
    pub fn sura_slot_of(&self, token: usize) -> usize {
        self.ayahs[self.token_ayah[token]].sura_slot
    }

    /// Ayah slots of the same surah whose ayah number lies within
    /// `distance` of the given ayah slot's number.
    pub fn ayah_neighbourhood(&self, ayah_slot: usize, distance: u32) -> Range<usize> {
        let centre = &self.ayahs[ayah_slot];
        let span = &self.suras[centre.sura_slot].ayahs;
        let lo = centre.ayah.ayah.saturating_sub(distance);
        let hi = centre.ayah.ayah.saturating_add(distance);
        let slots = &self.ayahs[span.clone()];
        let start = span.start + slots.partition_point(|a| a.ayah.ayah < lo);
        let end = span.start + slots.partition_point(|a| a.ayah.ayah <= hi);
        start..end
    }

    /// Ranks of the same surah within `distance` tokens of the given rank.
    pub fn token_neighbourhood(&self, rank: usize, distance: u32) -> Range<usize> {
        let sura = &self.suras[self.sura_slot_of(self.order[rank])].tokens;
        let d = distance as usize;
        let start = rank.saturating_sub(d).max(sura.start);
        let end = rank.saturating_add(d).saturating_add(1).min(sura.end);
        start..end
    }

    /// Token ranks covered by a contiguous run of ayah slots.
    pub fn ayah_range_tokens(&self, slots: Range<usize>) -> Range<usize> {
        if slots.is_empty() {
            return 0..0;
        }
        self.ayahs[slots.start].tokens.start..self.ayahs[slots.end - 1].tokens.end
    }
}
