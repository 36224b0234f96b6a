pub mod a001_alarm;
