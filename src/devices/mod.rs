// All devices supported here are Rigol.  If other manufacturers are ever supported, they'll get
// organized into modules by manufacturer

pub mod ds1000z;
