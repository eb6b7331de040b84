//! Unicode identifier tables.
//!
//! ES3 and ES5 targets use the paired-range tables below, each a flat list
//! of inclusive `[low, high]` code point pairs sorted ascending. Later
//! targets defer to the `unicode-xid` derived properties.

use tsdecl_ast::ScriptTarget;
use unicode_xid::UnicodeXID;

#[rustfmt::skip]
static ES5_IDENTIFIER_START: &[u32] = &[
    0x00AA, 0x00AA, 0x00B5, 0x00B5, 0x00BA, 0x00BA, 0x00C0, 0x00D6, 0x00D8, 0x00F6,
    0x00F8, 0x02C1, 0x02C6, 0x02D1, 0x02E0, 0x02E4, 0x02EC, 0x02EC, 0x02EE, 0x02EE,
    0x0370, 0x0374, 0x0376, 0x0377, 0x037A, 0x037D, 0x0386, 0x0386, 0x0388, 0x038A,
    0x038C, 0x038C, 0x038E, 0x03A1, 0x03A3, 0x03F5, 0x03F7, 0x0481, 0x048A, 0x0527,
    0x0531, 0x0556, 0x0559, 0x0559, 0x0561, 0x0587, 0x05D0, 0x05EA, 0x05F0, 0x05F2,
    0x0620, 0x064A, 0x066E, 0x066F, 0x0671, 0x06D3, 0x06D5, 0x06D5, 0x06E5, 0x06E6,
    0x06EE, 0x06EF, 0x06FA, 0x06FC, 0x06FF, 0x06FF, 0x0904, 0x0939, 0x093D, 0x093D,
    0x0950, 0x0950, 0x0958, 0x0961, 0x0971, 0x0977, 0x0E01, 0x0E30, 0x0E32, 0x0E33,
    0x0E40, 0x0E46, 0x10A0, 0x10C5, 0x10D0, 0x10FA, 0x1100, 0x1248, 0x1E00, 0x1F15,
    0x1F18, 0x1F1D, 0x1F20, 0x1F45, 0x1F48, 0x1F4D, 0x1F50, 0x1F57, 0x1F59, 0x1F59,
    0x1F5B, 0x1F5B, 0x1F5D, 0x1F5D, 0x1F5F, 0x1F7D, 0x1F80, 0x1FB4, 0x1FB6, 0x1FBC,
    0x2071, 0x2071, 0x207F, 0x207F, 0x2090, 0x209C, 0x2102, 0x2102, 0x2107, 0x2107,
    0x210A, 0x2113, 0x2115, 0x2115, 0x2119, 0x211D, 0x2124, 0x2124, 0x2126, 0x2126,
    0x2128, 0x2128, 0x212A, 0x212D, 0x212F, 0x2139, 0x2C00, 0x2C2E, 0x2C30, 0x2C5E,
    0x3005, 0x3007, 0x3021, 0x3029, 0x3031, 0x3035, 0x3038, 0x303C, 0x3041, 0x3096,
    0x309D, 0x309F, 0x30A1, 0x30FA, 0x30FC, 0x30FF, 0x3105, 0x312D, 0x3131, 0x318E,
    0x3400, 0x4DB5, 0x4E00, 0x9FCB, 0xA000, 0xA48C, 0xAC00, 0xD7A3, 0xF900, 0xFA2D,
    0xFB00, 0xFB06, 0xFB1D, 0xFB1D, 0xFB1F, 0xFB28, 0xFE70, 0xFE74, 0xFE76, 0xFEFC,
    0xFF21, 0xFF3A, 0xFF41, 0xFF5A, 0xFF66, 0xFFBE,
];

/// Combining marks, digits, and connector punctuation that may continue an
/// identifier in addition to everything in `ES5_IDENTIFIER_START`.
#[rustfmt::skip]
static ES5_IDENTIFIER_PART_EXTRA: &[u32] = &[
    0x0300, 0x036F, 0x0483, 0x0487, 0x0591, 0x05BD, 0x05BF, 0x05BF, 0x05C1, 0x05C2,
    0x05C4, 0x05C5, 0x05C7, 0x05C7, 0x0610, 0x061A, 0x064B, 0x0669, 0x0670, 0x0670,
    0x06D6, 0x06DC, 0x06DF, 0x06E4, 0x06E7, 0x06E8, 0x06EA, 0x06ED, 0x06F0, 0x06F9,
    0x0900, 0x0903, 0x093A, 0x093C, 0x093E, 0x094F, 0x0951, 0x0957, 0x0962, 0x0963,
    0x0966, 0x096F, 0x0E31, 0x0E31, 0x0E34, 0x0E3A, 0x0E47, 0x0E4E, 0x0E50, 0x0E59,
    0x203F, 0x2040, 0x2054, 0x2054, 0x20D0, 0x20DC, 0x20E1, 0x20E1, 0x20E5, 0x20F0,
    0x302A, 0x302F, 0x3099, 0x309A, 0xFE00, 0xFE0F, 0xFE20, 0xFE26, 0xFE33, 0xFE34,
    0xFE4D, 0xFE4F, 0xFF10, 0xFF19, 0xFF3F, 0xFF3F,
];

/// Binary search over a paired-range table.
fn lookup_in_unicode_map(code: u32, map: &[u32]) -> bool {
    if map.is_empty() || code < map[0] {
        return false;
    }
    let mut lo = 0;
    let mut hi = map.len();
    while lo + 1 < hi {
        let mut mid = lo + (hi - lo) / 2;
        mid -= mid % 2;
        if map[mid] <= code && code <= map[mid + 1] {
            return true;
        }
        if code < map[mid] {
            hi = mid;
        } else {
            lo = mid + 2;
        }
    }
    false
}

pub fn is_unicode_identifier_start(ch: char, target: ScriptTarget) -> bool {
    if target >= ScriptTarget::ES2015 {
        ch.is_xid_start()
    } else {
        lookup_in_unicode_map(ch as u32, ES5_IDENTIFIER_START)
    }
}

pub fn is_unicode_identifier_part(ch: char, target: ScriptTarget) -> bool {
    if target >= ScriptTarget::ES2015 {
        ch.is_xid_continue()
    } else {
        let code = ch as u32;
        lookup_in_unicode_map(code, ES5_IDENTIFIER_START)
            || lookup_in_unicode_map(code, ES5_IDENTIFIER_PART_EXTRA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(map: &[u32]) {
        assert_eq!(map.len() % 2, 0);
        for pair in map.chunks(2) {
            assert!(pair[0] <= pair[1], "{:#X} > {:#X}", pair[0], pair[1]);
        }
        for window in map.windows(2).skip(1).step_by(2) {
            assert!(window[0] < window[1], "ranges overlap at {:#X}", window[0]);
        }
    }

    #[test]
    fn test_tables_are_sorted_pairs() {
        assert_well_formed(ES5_IDENTIFIER_START);
        assert_well_formed(ES5_IDENTIFIER_PART_EXTRA);
    }

    #[test]
    fn test_lookup_boundaries() {
        assert!(lookup_in_unicode_map(0x00C0, ES5_IDENTIFIER_START));
        assert!(lookup_in_unicode_map(0x00D6, ES5_IDENTIFIER_START));
        assert!(!lookup_in_unicode_map(0x00D7, ES5_IDENTIFIER_START));
        assert!(lookup_in_unicode_map(0xFFBE, ES5_IDENTIFIER_START));
        assert!(!lookup_in_unicode_map(0x0041, ES5_IDENTIFIER_START));
    }

    #[test]
    fn test_target_selects_table() {
        // U+1D400 MATHEMATICAL BOLD CAPITAL A is ID_Start but outside the ES5 table.
        let ch = '\u{1D400}';
        assert!(is_unicode_identifier_start(ch, ScriptTarget::ES2015));
        assert!(!is_unicode_identifier_start(ch, ScriptTarget::ES5));
        assert!(is_unicode_identifier_part('\u{0301}', ScriptTarget::ES5));
        assert!(!is_unicode_identifier_start('\u{0301}', ScriptTarget::ES5));
    }
}
