pub mod ptt_digit;
