#![no_main]

use zep_frame::{checksum, decode_header, MacHeader, ZepHeader, FCS_LEN, HEADER_LEN};

use libfuzzer_sys::{fuzz_target, Corpus};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.len() > HEADER_LEN + 127 {
        return Corpus::Reject;
    }

    let Ok(header) = ZepHeader::new(data) else {
        return Corpus::Keep;
    };

    if decode_header(data).is_ok() {
        let payload = header.payload();
        let frame = &payload[..payload.len().saturating_sub(FCS_LEN)];
        let _ = checksum([frame]);

        if let Ok(mac) = MacHeader::new(frame) {
            let _ = mac.dst_address();
            let _ = mac.src_address();
            let _ = mac.payload();
        }
    }

    Corpus::Keep
});
