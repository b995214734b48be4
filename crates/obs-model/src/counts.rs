//! Fixed frame counts for the 50 OBS stories.

/// Expected number of frames per story, indexed by `chapter number - 1`.
///
/// This is fixed domain knowledge: every OBS translation has the same
/// story structure, so a complete chapter 7 always has 10 frames, etc.
pub const FRAME_COUNTS: [usize; 50] = [
    16, 12, 16, 9, 10, 12, 10, 15, 15, 12, // 01-10
    8, 14, 15, 15, 13, 18, 14, 13, 10, 13, // 11-20
    15, 7, 10, 9, 8, 10, 11, 10, 9, 9, // 21-30
    8, 16, 9, 10, 13, 7, 11, 15, 12, 9, // 31-40
    8, 11, 13, 9, 13, 10, 14, 14, 18, 17, // 41-50
];
