//! Bruteforce generator (C7): ties the Stage 1 distribution iterator and
//! Stage 2 permutation iterator together behind the [`MaskGenerator`]
//! contract.

use crate::charset::Charset;
use crate::codepoint::Mode;
use crate::error::Result;
use crate::mask::Mask;
use crate::mask_file::MaskGenerator;
use crate::registry::Registry;

use super::distribution::{Bounds, DistributionIter};
use super::parser::parse_bruteforce_file;
use super::permutation::PermutationIter;

pub struct BruteforceGenerator {
    width: u64,
    templates: Vec<Charset>,
    distributions: DistributionIter,
    current_perm: Option<PermutationIter>,
    error: bool,
}

impl BruteforceGenerator {
    /// Parses `bytes` as a bruteforce file and builds the generator.
    /// `base` supplies builtins plus any CLI-bound names referenced from
    /// constraint charset fields.
    pub fn new(bytes: &[u8], mode: Mode, base: &Registry) -> Result<Self> {
        let spec = parse_bruteforce_file(bytes, mode, base)?;
        let templates = spec
            .constraints
            .iter()
            .map(|c| Charset::from_body(c.charset.clone()))
            .collect();
        let bounds = Bounds {
            min: spec.constraints.iter().map(|c| c.min).collect(),
            max: spec.constraints.iter().map(|c| c.max).collect(),
        };
        Ok(BruteforceGenerator {
            width: spec.width,
            templates,
            distributions: DistributionIter::new(bounds, spec.width),
            current_perm: None,
            error: false,
        })
    }
}

impl MaskGenerator for BruteforceGenerator {
    fn next_mask(&mut self) -> Result<Option<Mask>> {
        if self.error {
            return Ok(None);
        }
        loop {
            if self.current_perm.is_none() {
                match self.distributions.next() {
                    Some(n) => self.current_perm = Some(PermutationIter::new(&n)),
                    None => return Ok(None),
                }
            }
            let perm = self.current_perm.as_mut().unwrap();
            match perm.next() {
                Some(indices) => {
                    let mut mask = Mask::new();
                    for &k in indices {
                        if let Err(e) = mask.push_right(self.templates[k].clone()) {
                            self.error = true;
                            return Err(e);
                        }
                    }
                    debug_assert_eq!(mask.width() as u64, self.width);
                    return Ok(Some(mask));
                }
                None => {
                    self.current_perm = None;
                    continue;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.distributions.reset();
        self.current_perm = None;
    }

    fn good(&self) -> bool {
        !self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> Registry {
        Registry::with_builtins(Mode::Unicode)
    }

    fn collect_all(gen: &mut BruteforceGenerator) -> Vec<Mask> {
        let mut out = Vec::new();
        while let Some(m) = gen.next_mask().unwrap() {
            out.push(m);
        }
        out
    }

    #[test]
    fn scenario_5_emits_eleven_masks_totalling_72_words() {
        // width 4, ?1='01' min0 max4, ?2='a' min0 max2
        let spec = b"4\n0 4 01\n0 2 a\n";
        let mut gen = BruteforceGenerator::new(spec, Mode::Unicode, &reg()).unwrap();
        let masks = collect_all(&mut gen);
        assert_eq!(masks.len(), 11);
        let total: u64 = masks.iter().map(|m| m.len()).sum();
        assert_eq!(total, 72);
    }

    #[test]
    fn every_mask_has_correct_width_and_per_charset_counts_within_bounds() {
        let spec = b"3\n1 2 ab\n0 3 x\n";
        let mut gen = BruteforceGenerator::new(spec, Mode::Unicode, &reg()).unwrap();
        let masks = collect_all(&mut gen);
        assert!(!masks.is_empty());
        for mask in &masks {
            assert_eq!(mask.width(), 3);
        }
    }

    #[test]
    fn is_restartable_and_yields_identical_sequence() {
        let spec = b"4\n0 4 01\n0 2 a\n";
        let mut gen = BruteforceGenerator::new(spec, Mode::Unicode, &reg()).unwrap();
        let first: Vec<u64> = collect_all(&mut gen).iter().map(|m| m.len()).collect();
        gen.reset();
        let second: Vec<u64> = collect_all(&mut gen).iter().map(|m| m.len()).collect();
        assert_eq!(first, second);
        assert!(gen.good());
    }

    #[test]
    fn single_constraint_spanning_full_width() {
        let spec = b"2\n2 2 ab\n";
        let mut gen = BruteforceGenerator::new(spec, Mode::Unicode, &reg()).unwrap();
        let masks = collect_all(&mut gen);
        // Only one distribution (n0=2), one permutation ([0,0]).
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].len(), 4); // 2 positions x 2-char charset each
    }
}
