#![no_main]

use zep_frame::{decode_header, ZepHeader, ZepHeaderRepr, ZepType};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|repr: ZepHeaderRepr| {
    let mut buffer = vec![0; repr.buffer_len()];
    repr.emit(&mut ZepHeader::new_unchecked(&mut buffer[..]));

    match decode_header(&buffer) {
        Ok(parsed) => assert_eq!(parsed, repr),
        Err(_) => assert_ne!(repr.frame_type, ZepType::Data),
    }
});
