mod fixtures;

mod create;
